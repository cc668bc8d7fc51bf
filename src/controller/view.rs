//! Snapshot of everything a rendering surface needs for one frame.

use crate::controller::{FactPanel, MarkerState, Visibility};
use crate::dataset::{CityName, RegionId};
use crate::game::{CityMode, Outcome, Phase, Prompt};
use crate::geo::ScreenPoint;
use crate::viewport::Transform;

/// Styling of one region or territory outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionStyle {
    /// Region or territory id.
    pub id: RegionId,
    /// Group tag from the dataset.
    pub group: String,
    /// Active correct/wrong flash.
    pub flash: Option<Outcome>,
    /// Whether the camera is focused on this region.
    pub focused: bool,
}

/// A city marker as drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    /// City name, shown as a tooltip on hover.
    pub city: CityName,
    /// Map-space center.
    pub position: ScreenPoint,
    /// Map-space radius; multiply by the transform scale for pixels.
    pub radius: f64,
    /// Guess state.
    pub state: MarkerState,
}

/// Render-ready state of the controller at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Prompt text.
    pub prompt: Prompt,
    /// Current score.
    pub score: i32,
    /// Current phase.
    pub phase: Phase,
    /// Current city mode.
    pub mode: CityMode,
    /// Whether the mode switch accepts input.
    pub mode_enabled: bool,
    /// Wrong-guess feedback line.
    pub feedback: Option<String>,
    /// How the feedback line is shown.
    pub feedback_visibility: Visibility,
    /// Open fact panel.
    pub panel: Option<FactPanel>,
    /// Region and territory styles, in hit-test order.
    pub regions: Vec<RegionStyle>,
    /// City markers.
    pub markers: Vec<MarkerView>,
    /// City under the pointer.
    pub hovered: Option<CityName>,
    /// Map-to-screen transform.
    pub transform: Transform,
}
