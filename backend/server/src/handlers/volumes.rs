use crate::state::AppState;
use actix_web::{HttpResponse, web};
use serde_json::json;

pub async fn named(state: web::Data<AppState>) -> HttpResponse {
    let volumes = &state.volume_service;
    let mount = format!("{} (named volume)", volumes.named_path().display());

    match volumes.sample_named().await {
        Ok(files) => HttpResponse::Ok().json(json!({
            "mount": mount,
            "managed_by": "Docker Engine",
            "survives_container_removal": true,
            "sample_files": files,
            "note": "This data persists even after docker rm",
        })),
        // A missing mount is expected outside compose, so this stays a 200.
        Err(e) => {
            log::debug!("Named volume unavailable: {:#}", e);
            HttpResponse::Ok().json(json!({
                "mount": mount,
                "note": "Mount not present in this demo context — see compose.yml",
            }))
        }
    }
}

pub async fn bind(state: web::Data<AppState>) -> HttpResponse {
    let volumes = &state.volume_service;

    match volumes.inspect_bind().await {
        Ok(snapshot) => HttpResponse::Ok().json(json!({
            "mount": format!("{} (bind mount from host)", volumes.bind_path().display()),
            "managed_by": "Host OS filesystem",
            "live_reload": true,
            "files_in_src": snapshot.files,
            "first_5_lines_of_sample": snapshot.head,
            "note": "Edit the file on your host — the change is immediately visible here",
        })),
        Err(e) => HttpResponse::Ok().json(json!({ "error": format!("{:#}", e) })),
    }
}

pub async fn tmpfs(state: web::Data<AppState>) -> HttpResponse {
    let volumes = &state.volume_service;

    match volumes.round_trip_tmpfs().await {
        Ok(trip) => HttpResponse::Ok().json(json!({
            "mount": format!("{} (tmpfs — in-memory)", volumes.tmpfs_path().display()),
            "managed_by": "Host RAM (never written to disk)",
            "survives_container_removal": false,
            "wrote": trip.wrote.display().to_string(),
            "read_back": trip.read_back,
            "note": "This file exists only in memory. It vanishes when the container stops.",
        })),
        Err(e) => {
            log::error!("tmpfs round trip failed: {:#}", e);
            HttpResponse::InternalServerError().json(json!({ "error": format!("{:#}", e) }))
        }
    }
}
