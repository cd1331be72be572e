pub mod call;
pub mod catalog_loader;
pub mod check;
pub mod classes;
pub mod dump;
pub mod emit;
pub mod lookup;
pub mod modules;

#[cfg(test)]
mod call_tests;
#[cfg(test)]
mod catalog_loader_tests;
#[cfg(test)]
mod classes_tests;
#[cfg(test)]
mod modules_tests;
