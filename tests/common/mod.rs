#![allow(dead_code, unused_imports)]

pub use dagboard_test_utils::builders;
pub use dagboard_test_utils::fake_scheduler::FakeScheduler;
pub use dagboard_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;

use dagboard::dashboard::{Dashboard, DashboardSettings};

/// Dashboard over a shared fake, with the default indent clamp.
pub fn dashboard_over(fake: &Arc<FakeScheduler>) -> Dashboard {
    Dashboard::new(fake.clone(), DashboardSettings::default())
}
