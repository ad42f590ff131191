//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Methods that touch campus-scoped tables take the
//! campus id and filter on it; callers resolve which campuses the
//! authenticated user may pass in.

pub mod campus;
pub mod fee_template;
pub mod invoice;
pub mod payment;
pub mod report;
pub mod student;
pub mod user;
pub mod void;

pub use campus::{CampusRepository, CreateCampusInput};
pub use fee_template::{CreateFeeTemplateInput, FeeTemplateRepository};
pub use invoice::{CreateInvoiceInput, InvoiceDetail, InvoiceFilter, InvoiceRepository};
pub use payment::{PaymentRepository, RecordPaymentInput, RecordedPayment};
pub use report::{ReportError, ReportRepository};
pub use student::{CreateStudentInput, StudentFilter, StudentRepository};
pub use user::{CreateUserInput, UserRepository, UserWithGrants};
pub use void::{PendingVoidRequest, VoidRepository};
