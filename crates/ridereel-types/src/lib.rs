pub mod api;
pub mod models;

pub use models::{
    Event, NewEvent, NewPurchase, NewRider, PaymentMethod, Purchase, Rider, User,
};
