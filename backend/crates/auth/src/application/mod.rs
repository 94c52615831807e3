//! Application Layer
//!
//! One use case per file, each a struct over generic repository traits.

pub mod activate_account;
pub mod config;
pub mod login;
pub mod sign_up;
pub mod user_info;
pub mod verify_two_factor;

pub use activate_account::ActivateAccountUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use user_info::UserInfoUseCase;
pub use verify_two_factor::{VerifyTwoFactorInput, VerifyTwoFactorOutput, VerifyTwoFactorUseCase};
