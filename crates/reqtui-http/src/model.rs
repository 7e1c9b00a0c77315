/// HTTP methods offered by the method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// The selector's choices, in display order.
pub const METHODS: [HttpMethod; 5] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Patch,
    HttpMethod::Delete,
];

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        METHODS.into_iter().find(|m| m.as_str() == s)
    }
}

/// Single-choice radio over [`METHODS`]. No wraparound.
#[derive(Debug, Clone, Default)]
pub struct MethodSelector {
    selected_index: usize,
}

impl MethodSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected(&self) -> HttpMethod {
        METHODS[self.selected_index]
    }

    pub fn choices(&self) -> &'static [HttpMethod] {
        &METHODS
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < METHODS.len() {
            self.selected_index += 1;
        }
    }

    pub fn select(&mut self, method: HttpMethod) {
        if let Some(idx) = METHODS.iter().position(|m| *m == method) {
            self.selected_index = idx;
        }
    }
}
