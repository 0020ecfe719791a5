//! Extractores de petición con rechazo en formato `AppError`
//!
//! Un id mal formado o un cuerpo JSON inválido responden con el mismo cuerpo
//! `{error, message, code}` que el resto de errores de la API.

use axum::extract::{FromRequest, FromRequestParts};

use crate::utils::errors::AppError;

/// `Json<T>` cuyo rechazo se convierte en error de validación
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Path<T>` cuyo rechazo se convierte en error de validación
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
