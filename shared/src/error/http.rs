//! HTTP status of each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        use ErrorCode::*;

        match self {
            Success => StatusCode::OK,

            ValidationFailed | InvalidRequest | PasswordTooShort | SlugInvalid
            | TimezoneInvalid | ScheduleInvalid | OrderEmpty | InvalidOrderStatus
            | ProductInvalidPrice => StatusCode::BAD_REQUEST,

            NotAuthenticated | InvalidCredentials | TokenExpired | TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            AdminRequired => StatusCode::FORBIDDEN,

            StoreNotFound | PlanNotFound | SubscriptionNotFound | OrderNotFound | ItemNotFound
            | ProductNotFound | CategoryNotFound | IngredientNotFound
            | IngredientCategoryNotFound => StatusCode::NOT_FOUND,

            EmailAlreadyRegistered | SlugTaken | ScheduleDuplicateDay | CategoryNameExists
            | AssociationDuplicate => StatusCode::CONFLICT,

            // well-formed, refused by a business rule
            StoreClosed | OrderTotalMismatch => StatusCode::UNPROCESSABLE_ENTITY,

            InternalError | DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
