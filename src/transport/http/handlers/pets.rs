use crate::domain::form::RegistrationForm;
use crate::transport::http::handlers::common::{
    commit_or_recover, lock_store, parse_pet_id, recover,
};
use crate::transport::http::types::AppState;
use crate::transport::http::views;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

fn not_found_response(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found(message))).into_response()
}

fn pet_not_found(raw_id: &str) -> Response {
    not_found_response(&format!("Pet with id {} not found", raw_id))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Pet list (empty when the store is unavailable)", body = String, content_type = "text/html")
    )
)]
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let mut store = lock_store(&state).await;
    let result = store.list_pets().await;
    let pets = match result {
        Ok(pets) => {
            // Reads end the transaction too, so the connection is not left idle in one.
            if let Err(e) = store.rollback().await {
                tracing::debug!(error = %e, "Could not end read transaction");
            }
            pets
        }
        Err(e) => {
            recover(&mut *store, "list", e).await;
            Vec::new()
        }
    };
    Html(views::index(&pets))
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Empty registration form", body = String, content_type = "text/html")
    )
)]
pub async fn register_form_handler() -> Html<String> {
    Html(views::registration_form(
        "Register a pet",
        "/register",
        &RegistrationForm::default(),
    ))
}

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegistrationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Always redirects to the pet list")
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    form: Result<Form<RegistrationForm>, FormRejection>,
) -> Redirect {
    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected registration body");
            return Redirect::to("/");
        }
    };

    let record = match form.validate() {
        Ok(r) => r,
        Err(errors) => {
            tracing::warn!(?errors, "Registration form failed validation");
            return Redirect::to("/");
        }
    };

    let mut store = lock_store(&state).await;
    let result = store.insert(&record).await;
    if let Some(id) = commit_or_recover(&mut *store, "register", result).await {
        tracing::info!(pet_id = id, owner = %record.owner, "Registered pet");
    }
    Redirect::to("/")
}

#[utoipa::path(
    get,
    path = "/update/{id}",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Form pre-filled with the pet", body = String, content_type = "text/html"),
        (status = 303, description = "Store unavailable; redirected to the pet list"),
        (status = 404, description = "No pet with this id", body = String, content_type = "text/html")
    )
)]
pub async fn edit_form_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_pet_id(&raw_id) else {
        return pet_not_found(&raw_id);
    };

    let mut store = lock_store(&state).await;
    let result = store.get_pet(id).await;
    let pet = match result {
        Ok(pet) => pet,
        Err(e) => {
            recover(&mut *store, "edit", e).await;
            return Redirect::to("/").into_response();
        }
    };
    if let Err(e) = store.rollback().await {
        tracing::debug!(error = %e, "Could not end read transaction");
    }
    drop(store);

    match pet {
        Some(pet) => {
            let action = format!("/update/{}", pet.id);
            Html(views::registration_form(
                "Update pet",
                &action,
                &RegistrationForm::from_pet(&pet),
            ))
            .into_response()
        }
        None => pet_not_found(&raw_id),
    }
}

#[utoipa::path(
    post,
    path = "/update/{id}",
    params(("id" = String, Path, description = "Pet id")),
    request_body(content = RegistrationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Always redirects to the pet list")
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    form: Result<Form<RegistrationForm>, FormRejection>,
) -> Redirect {
    let Some(id) = parse_pet_id(&raw_id) else {
        tracing::warn!(id = %raw_id, "Invalid pet id");
        return Redirect::to("/");
    };
    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(pet_id = id, error = %e, "Rejected update body");
            return Redirect::to("/");
        }
    };

    let record = match form.validate() {
        Ok(r) => r,
        Err(errors) => {
            tracing::warn!(pet_id = id, ?errors, "Update form failed validation");
            return Redirect::to("/");
        }
    };

    let mut store = lock_store(&state).await;
    let result = store.update(id, &record).await;
    if commit_or_recover(&mut *store, "update", result).await.is_some() {
        tracing::info!(pet_id = id, "Updated pet");
    }
    Redirect::to("/")
}

#[utoipa::path(
    get,
    path = "/delete/{id}",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 303, description = "Always redirects to the pet list")
    )
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Redirect {
    let Some(id) = parse_pet_id(&raw_id) else {
        tracing::warn!(id = %raw_id, "Invalid pet id");
        return Redirect::to("/");
    };

    let mut store = lock_store(&state).await;
    let result = store.delete(id).await;
    if commit_or_recover(&mut *store, "delete", result).await.is_some() {
        tracing::info!(pet_id = id, "Deleted pet");
    }
    Redirect::to("/")
}

pub async fn not_found_handler() -> Response {
    not_found_response("The requested page was not found")
}
