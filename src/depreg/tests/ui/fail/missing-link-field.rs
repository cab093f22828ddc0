#![allow(dead_code)]

use depreg::link::HasRegistryLink;

#[derive(HasRegistryLink)]
struct Service { name: String }

fn main() {}
