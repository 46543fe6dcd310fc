//! Webhook routing and plan job construction

pub mod handler;
pub mod jobs;


pub use handler::{Dispatch, EventHandler};
pub use jobs::{build_plan_job, plan_id, request_id, DeliveryMeta, JobSettings};
