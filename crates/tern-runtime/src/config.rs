//! Runtime configuration.

/// Limits and switches for a [`crate::Runtime`].
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Maximum live heap objects, root included (default: 1,024).
    pub(crate) heap_capacity: usize,
    /// Maximum prototype links followed per lookup (default: 8).
    pub(crate) max_prototype_depth: usize,
    /// Evaluate the startup script during engine init (default: true).
    pub(crate) run_boot_script: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            heap_capacity: 1024,
            max_prototype_depth: 8,
            run_boot_script: true,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heap_capacity(mut self, capacity: usize) -> Self {
        self.heap_capacity = capacity;
        self
    }

    pub fn max_prototype_depth(mut self, depth: usize) -> Self {
        self.max_prototype_depth = depth;
        self
    }

    pub fn run_boot_script(mut self, run: bool) -> Self {
        self.run_boot_script = run;
        self
    }

    pub fn get_heap_capacity(&self) -> usize {
        self.heap_capacity
    }
    pub fn get_max_prototype_depth(&self) -> usize {
        self.max_prototype_depth
    }
    pub fn get_run_boot_script(&self) -> bool {
        self.run_boot_script
    }
}
