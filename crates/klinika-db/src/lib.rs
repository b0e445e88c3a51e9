//! # klinika-db: Database Layer
//!
//! SQLite storage for the clinic backend.
//!
//! ## Architecture Position
//! ```text
//! axum handler (create_sale)
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    klinika-db (THIS CRATE)                   │
//! │                                                              │
//! │   Database        repositories            migrations         │
//! │   (pool.rs)       (one per aggregate)     (embedded SQL)     │
//! │   SqlitePool      patient, sale, ...      001_initial...     │
//! └──────────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! SQLite database file (WAL mode, foreign keys ON)
//! ```
//!
//! ## Transaction Policy
//! Any operation that writes more than one row (a sale with its items
//! and stock decrements, a bill with its service lines, a payment with
//! its settlement update, a prescription with its items) runs inside a
//! single transaction owned by the repository. Partial effects are
//! never visible to other connections.
//!
//! ## Usage
//! ```rust,ignore
//! use klinika_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("klinika.db")).await?;
//! let sale = db.sales().create(&input, Utc::now()).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::appointment::AppointmentRepository;
pub use repository::billing::BillingRepository;
pub use repository::dashboard::DashboardRepository;
pub use repository::medical_record::MedicalRecordRepository;
pub use repository::medicine::MedicineRepository;
pub use repository::patient::PatientRepository;
pub use repository::prescription::PrescriptionRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::{generate_sale_number, SaleRepository};
pub use repository::service::ServiceRepository;
pub use repository::user::UserRepository;
