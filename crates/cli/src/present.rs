//! Presentation boundary shared by every output format

use crate::error::Result;
use case_dash_core::{DashboardState, DashboardViews, Notification};
use chrono::{DateTime, Utc};

/// Page-level information that is not part of the aggregate views
#[derive(Debug, Clone, Default)]
pub struct RenderContext<'a> {
    pub title: &'a str,
    /// Label of the snapshot's source, if anything is loaded
    pub source: Option<&'a str>,
    pub last_update: Option<DateTime<Utc>>,
    /// Latest notification; only the most recent trigger is shown
    pub notification: Option<&'a Notification>,
    /// Decoder warnings for the current snapshot
    pub warnings: &'a [String],
}

impl<'a> RenderContext<'a> {
    /// Context describing the current state of `state`
    pub fn for_state(
        title: &'a str,
        state: &'a DashboardState,
        notification: Option<&'a Notification>,
    ) -> Self {
        let snapshot = state.snapshot();
        Self {
            title,
            source: snapshot.map(|s| s.source.as_str()),
            last_update: snapshot.map(|s| s.loaded_at),
            notification,
            warnings: snapshot.map(|s| s.warnings.as_slice()).unwrap_or(&[]),
        }
    }
}

/// Something that can draw the dashboard views
pub trait Presenter {
    /// Draw the views, or the pre-load page when nothing is loaded yet
    fn render(&mut self, views: Option<&DashboardViews>, ctx: &RenderContext<'_>) -> Result<()>;

    /// Dispose of whatever the previous `render` produced
    fn clear(&mut self) -> Result<()>;
}

/// Release the previous rendering, then draw the current one
pub fn redraw<P: Presenter + ?Sized>(
    presenter: &mut P,
    views: Option<&DashboardViews>,
    ctx: &RenderContext<'_>,
) -> Result<()> {
    presenter.clear()?;
    presenter.render(views, ctx)
}
