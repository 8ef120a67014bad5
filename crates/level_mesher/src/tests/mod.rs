//! Whole-pipeline tests driven through [`LevelMesher`](crate::pipeline::LevelMesher)

mod pipeline_scenarios;
