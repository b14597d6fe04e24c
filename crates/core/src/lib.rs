pub mod admin;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod errors;
pub mod storage;

pub use admin::{AccessDenied, AdminGate, ACCESS_DENIED_MESSAGE};
pub use checkout::message::{
    message_handoff, order_message, MessageHandoff, MessageHandoffError, MessagingConfig,
};
pub use checkout::payment::{
    payment_reference, to_minor_units, CheckoutError, CheckoutState, PaymentConfig, PaymentError,
    PaymentGateway, PaymentMetadata, PaymentOutcome, PaymentRequest, PaymentSession,
};
pub use domain::hero::{HeroImage, HeroImageDraft, HeroImageId};
pub use domain::order::OrderSummary;
pub use domain::product::{Product, ProductDraft, ProductId};
pub use domain::selection::{
    decremented, SelectedItem, SelectionEntry, SelectionStore, DEFAULT_QUANTITY,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use storage::{object_name, object_name_from_url, ImageStore, ImageStoreError};
