//! Application Layer
//!
//! Use cases and application services.

pub mod accept_terms;
pub mod access_guard;
pub mod change_password;
pub mod check_reset_token;
pub mod check_session;
pub mod config;
pub mod get_profile;
pub mod issue_reset_token;
pub mod login;
pub mod logout;
pub mod redeem_reset_token;
pub mod register;
pub mod session_token;
pub mod update_profile;

// Re-exports
pub use accept_terms::AcceptTermsUseCase;
pub use access_guard::{TermsDecision, TermsGate, require_admin};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use check_reset_token::CheckResetTokenUseCase;
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use get_profile::GetProfileUseCase;
pub use issue_reset_token::IssueResetTokenUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use redeem_reset_token::RedeemResetTokenUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileOutput, UpdateProfileUseCase};
