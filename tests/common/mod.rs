#![allow(dead_code)]

pub mod helpers;
pub mod mocks;
pub mod test_app;

pub use helpers::{fixed_today, generate_test_email, member, member_named};
pub use mocks::{
    FailingNutrition, FailingRecordStore, InMemoryRecordStore, MissingNutrition, StubNutrition,
};
pub use test_app::TestApp;
