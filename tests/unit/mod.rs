mod book_invariant_tests;
mod execution_model_tests;
mod feed_pipeline_tests;
