use std::collections::VecDeque;

/// Fixed-size trailing window with running mean and variance.
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    values: VecDeque<f64>,
    window_size: usize,
}

impl TrailingWindow {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.window_size {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f64>() / self.values.len() as f64
        }
    }

    /// Population variance; zero for fewer than two values.
    pub fn variance(&self) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
