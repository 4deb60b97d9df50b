use crate::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Gestures {
    /// Fraction of the viewport width a drag must cover to change the page.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(0.4))]
    pub commit_threshold: FloatOrInt<0, 1>,
    /// How many times the horizontal movement must exceed the vertical one before a deal swipe
    /// takes over from vertical scrolling.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(3.))]
    pub horizontal_dominance: FloatOrInt<1, 100>,
    /// Touches starting above this y (in logical pixels) go to the image carousel instead.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(200.))]
    pub deal_swipe_min_y: FloatOrInt<0, 65535>,
}

impl Default for Gestures {
    fn default() -> Self {
        Self {
            commit_threshold: FloatOrInt(0.4),
            horizontal_dominance: FloatOrInt(3.),
            deal_swipe_min_y: FloatOrInt(200.),
        }
    }
}
