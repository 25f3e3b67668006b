//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod forms;
pub mod note;
pub mod pagination;
pub mod user;
pub mod validation;

pub use forms::{
    Credentials, FieldError, FormErrors, LoginForm, NoteForm, NoteInput, RegisterForm,
    Registration,
};
pub use note::{NoteContent, NoteTitle};
pub use pagination::{PageParams, Paginated, Pagination};
pub use user::{Password, Username};
pub use validation::ValidationError;
