/// Entry type names as reported by the instrumentation subsystem
pub mod names {
    pub const PAINT: &str = "paint";
    pub const LARGEST_CONTENTFUL_PAINT: &str = "largest-contentful-paint";
    pub const FIRST_INPUT: &str = "first-input";
    pub const LAYOUT_SHIFT: &str = "layout-shift";
    pub const NAVIGATION: &str = "navigation";
    pub const EVENT: &str = "event";
}

/// Name of the paint entry that marks First Contentful Paint
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// Event names that count as interactions for INP
pub const INTERACTION_EVENTS: [&str; 5] = ["pointerup", "pointerdown", "click", "keydown", "keyup"];
