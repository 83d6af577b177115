pub mod connections;
pub mod drawing;
pub mod holistic_model;
pub mod keypoints;
