/// Breed names offered as suggestions for the search input
///
/// Loaded once per mount of the search surface. A failed load leaves the
/// options empty; searching still works as free text.
#[derive(Debug, Clone, Default)]
pub struct BreedLookup {
    options: Vec<String>,
    loading: bool,
    loaded: bool,
}

impl BreedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Mark the load as started; returns false if it already ran
    pub fn start(&mut self) -> bool {
        if self.loaded || self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Record the load outcome
    pub fn finish(&mut self, options: Vec<String>) {
        self.options = options;
        self.loading = false;
        self.loaded = true;
    }

    /// Options containing `input`, ignoring case, in service order
    pub fn suggestions(&self, input: &str) -> Vec<&str> {
        let needle = input.trim().to_lowercase();
        self.options
            .iter()
            .filter(|breed| needle.is_empty() || breed.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
