use crate::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Search {
    #[knuffel(child, unwrap(argument), default = 300)]
    pub debounce_ms: u16,
}

impl Default for Search {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Splash {
    /// Width kept clear of the viewport edges while the title moves back and forth.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(150.))]
    pub title_margin: FloatOrInt<0, 65535>,
}

impl Default for Splash {
    fn default() -> Self {
        Self {
            title_margin: FloatOrInt(150.),
        }
    }
}
