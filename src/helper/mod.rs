pub mod holistic_helper;
