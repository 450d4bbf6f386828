use burn::data::dataset::Dataset;

use crate::domain::image_example::ImageExample;

pub struct ImageDataset {
    examples: Vec<ImageExample>,
}

impl ImageDataset {
    pub fn new(examples: Vec<ImageExample>) -> Self {
        Self { examples }
    }

    pub fn example_count(&self) -> usize {
        self.examples.len()
    }
}

impl Dataset<ImageExample> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageExample> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_len() {
        let ds = ImageDataset::new(vec![
            ImageExample::new(vec![0.0; 4]),
            ImageExample::new(vec![1.0; 4]),
        ]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).unwrap().pixels, vec![1.0; 4]);
        assert!(ds.get(2).is_none());
    }
}
