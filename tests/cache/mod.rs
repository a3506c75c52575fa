mod dispatch_tests;
mod store_tests;
