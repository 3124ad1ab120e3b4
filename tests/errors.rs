use apparel_storefront::error::AppError;
use axum::{http::StatusCode, response::IntoResponse};
use sea_orm::DbErr;

#[test]
fn variants_map_to_status_codes() {
    assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    assert_eq!(
        AppError::BadRequest("name and slug are required".into())
            .into_response()
            .status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::Conflict("slug taken".into()).into_response().status(),
        StatusCode::CONFLICT
    );
}

#[test]
fn other_database_errors_stay_server_errors() {
    let err = AppError::from(DbErr::RecordNotFound("categories".into()));
    assert!(matches!(err, AppError::OrmError(_)));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
