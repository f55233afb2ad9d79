use web_metrics::entry::{NavigationTiming, TimingEntry};

/// Builds a navigation timing entry, starting from a typical page load
pub struct TestNavigationBuilder {
    timing: NavigationTiming,
}

impl TestNavigationBuilder {
    pub fn new() -> Self {
        Self {
            timing: NavigationTiming {
                name: "https://example.com".to_string(),
                navigation_type: "navigate".to_string(),
                start_time: 0.0,
                redirect_start: 0.0,
                redirect_end: 0.0,
                redirect_count: Some(0),
                fetch_start: 0.0,
                domain_lookup_start: 50.0,
                domain_lookup_end: 100.0,
                connect_start: 100.0,
                connect_end: 200.0,
                request_start: 250.0,
                response_start: 300.0,
                response_end: 400.0,
                dom_interactive: 500.0,
                dom_content_loaded_event_start: 600.0,
                dom_content_loaded_event_end: 700.0,
                dom_complete: 800.0,
                load_event_start: 1000.0,
                load_event_end: 1100.0,
                transfer_size: Some(12345),
                decoded_body_size: Some(67890),
                ..Default::default()
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.timing.name = name.to_string();
        self
    }

    pub fn navigation_type(mut self, navigation_type: &str) -> Self {
        self.timing.navigation_type = navigation_type.to_string();
        self
    }

    pub fn response(mut self, request_start: f64, response_start: f64, response_end: f64) -> Self {
        self.timing.request_start = request_start;
        self.timing.response_start = response_start;
        self.timing.response_end = response_end;
        self
    }

    pub fn load_event(mut self, start: f64, end: f64) -> Self {
        self.timing.load_event_start = start;
        self.timing.load_event_end = end;
        self
    }

    pub fn secure_connection_start(mut self, at: f64) -> Self {
        self.timing.secure_connection_start = at;
        self
    }

    pub fn sizes(mut self, transfer: Option<u64>, decoded: Option<u64>) -> Self {
        self.timing.transfer_size = transfer;
        self.timing.decoded_body_size = decoded;
        self
    }

    pub fn build(self) -> NavigationTiming {
        self.timing
    }

    pub fn entry(self) -> TimingEntry {
        TimingEntry::navigation(self.timing)
    }
}

impl Default for TestNavigationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One batch covering every category, in the order a browser would report a
/// typical page load
pub fn sample_batch() -> Vec<TimingEntry> {
    vec![
        TimingEntry::paint("first-contentful-paint", 123.0),
        TimingEntry::largest_contentful_paint(456.0),
        TimingEntry::first_input(789.0, 800.0, 50.0),
        TimingEntry::layout_shift(0.1, true),
        TimingEntry::layout_shift(1.0, false),
        TestNavigationBuilder::new().entry(),
    ]
}
