//! Side effects requested by the reconciler.

use std::time::Duration;

/// A scrolling container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// The table body.
    Table,
    /// The navigation panel.
    Nav,
}

/// An instruction for the host.
///
/// The reconciler never touches the display itself. It updates its
/// [`RenderPlan`](super::RenderPlan) and asks the host to perform these.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Scroll a container to `top` pixels.
    SetScrollTop {
        container: Container,
        top: f32,
        smooth: bool,
    },
    /// Transition classes may be re-enabled.
    ResumeTransitions,
    /// Restart the highlight animation on a row.
    ///
    /// `generation` grows with every highlight so repeated highlights of the
    /// same row are distinguishable.
    Highlight { row_id: String, generation: u64 },
    /// Remove any row highlight.
    ClearHighlight,
    /// Set the location fragment without triggering navigation.
    PushFragment { id: String },
    /// Start the expand or collapse height transition of a group.
    GroupAnimation {
        group: String,
        expanding: bool,
        duration: Duration,
    },
    /// The group's height transition is over.
    GroupAnimationFinished { group: String },
    /// Start a download of `href`.
    Download { href: String },
    /// Tell the user an action failed.
    Alert { message: String },
}
