use mga_core::models::{Dimension, FeasibleRegion, Point};
use serde::Serialize;

#[derive(Serialize)]
pub struct Summary {
    pub samples: usize,
    pub dimensions: Vec<DimensionSummary>,
    pub centroid: Point,
}

#[derive(Serialize)]
pub struct DimensionSummary {
    pub name: Dimension,
    pub lower: f64,
    pub upper: f64,
    pub range: f64,
}

/// The global extent of every dimension, and the point the walk starts from
pub fn summarize(region: &FeasibleRegion) -> Summary {
    let dimensions = region
        .dimensions()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let extent = region.extent(index);
            DimensionSummary {
                name: name.clone(),
                lower: extent.lower,
                upper: extent.upper,
                range: extent.range(),
            }
        })
        .collect();

    Summary {
        samples: region.samples(),
        dimensions,
        centroid: region.centroid().point,
    }
}
