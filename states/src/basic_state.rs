use chrono::{DateTime, Utc};

use crate::State;

/// Frame clock. The UI refreshes it once per frame; tests set it by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct Time {
    virt: DateTime<Utc>,
}

impl Time {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self { virt: time }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}

impl State for Time {}

impl AsMut<DateTime<Utc>> for Time {
    fn as_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.virt
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.virt
    }
}
