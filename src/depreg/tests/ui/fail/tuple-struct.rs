#![allow(dead_code)]

use depreg::link::{HasRegistryLink, RegistryLink};

#[derive(HasRegistryLink)]
struct Service(RegistryLink);

fn main() {}
