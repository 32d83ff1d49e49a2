pub mod auth;
pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod retry;

pub use auth::{
    AuthType, Authenticator, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator,
};
pub use client::{BaseService, ServiceOptions};
pub use error::{ApiError, ApiErrorKind, Error, ErrorDetail};
pub use request::RequestBuilder;
pub use response::DetailedResponse;
pub use retry::RetryPolicy;
