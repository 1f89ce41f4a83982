use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use secrecy::{ExposeSecret, Secret};

use crate::activation::{confirm_activation, ActivationTokenManager, ConfirmActivationError};
use crate::domain::ActivationEmail;
use crate::users::UserRepository;
use crate::utils::e400;

#[derive(serde::Deserialize)]
pub struct Parameters {
    email: String,
    token: Secret<String>,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[tracing::instrument(name = "Confirm a pending activation", skip(parameters, repository, manager))]
pub async fn activate(
    parameters: web::Query<Parameters>,
    repository: web::Data<dyn UserRepository>,
    manager: web::Data<ActivationTokenManager>,
) -> Result<HttpResponse, actix_web::Error> {
    let Parameters { email, token } = parameters.into_inner();
    let email =
        ActivationEmail::parse(email).map_err(|_| e400("The activation email is not valid"))?;
    if token.expose_secret().trim().is_empty() {
        return Err(e400("The activation token is empty"));
    }

    confirm_activation(repository.get_ref(), manager.get_ref(), &email, token).await?;
    Ok(HttpResponse::Ok().finish())
}

impl actix_web::error::ResponseError for ConfirmActivationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConfirmActivationError::Rejected(_) => StatusCode::UNAUTHORIZED,
            ConfirmActivationError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // The body never says which check failed.
    fn error_response(&self) -> HttpResponse {
        match self {
            ConfirmActivationError::Rejected(_) => {
                HttpResponse::build(self.status_code()).json(ErrorBody {
                    error: "ACTIVATION_REJECTED",
                })
            }
            ConfirmActivationError::UnexpectedError(_) => {
                HttpResponse::build(self.status_code()).finish()
            }
        }
    }
}
