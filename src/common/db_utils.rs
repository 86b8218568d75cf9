use crate::common::error::{AppError, Resource};

// ---
// Helpers de mapeamento de erros do Postgres
// ---

/// Traduz violações de UNIQUE em um erro de domínio. Os demais erros passam adiante.
pub(crate) fn on_unique_violation(err: sqlx::Error, conflict: impl FnOnce() -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return conflict();
        }
    }
    err.into()
}

/// Em INSERT/UPDATE, uma FK violada significa que a referência não existe.
/// O nome da constraint (`products_category_id_fkey`...) diz qual delas.
pub(crate) fn on_missing_reference(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            let resource = db_err
                .constraint()
                .and_then(resource_for_constraint)
                .unwrap_or(Resource::Product);
            return AppError::ResourceNotFound(resource);
        }
    }
    err.into()
}

/// Em DELETE, uma FK violada significa que ainda há linhas apontando para o registro.
pub(crate) fn on_still_referenced(err: sqlx::Error, resource: Resource) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return AppError::ResourceInUse(resource);
        }
    }
    err.into()
}

fn resource_for_constraint(constraint: &str) -> Option<Resource> {
    if constraint.contains("category_id") {
        Some(Resource::Category)
    } else if constraint.contains("material_id") {
        Some(Resource::Material)
    } else if constraint.contains("brand_id") {
        Some(Resource::Brand)
    } else if constraint.contains("color_id") {
        Some(Resource::Color)
    } else if constraint.contains("role_id") {
        Some(Resource::Role)
    } else if constraint.contains("promotion_id") {
        Some(Resource::Promotion)
    } else if constraint.contains("product_id") {
        Some(Resource::Product)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_point_at_the_missing_table() {
        assert_eq!(
            resource_for_constraint("products_category_id_fkey"),
            Some(Resource::Category)
        );
        assert_eq!(
            resource_for_constraint("product_color_stocks_color_id_fkey"),
            Some(Resource::Color)
        );
        assert_eq!(resource_for_constraint("users_role_id_fkey"), Some(Resource::Role));
        assert_eq!(resource_for_constraint("something_else"), None);
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = on_unique_violation(sqlx::Error::RowNotFound, || AppError::EmailAlreadyExists);
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }
}
