#![allow(dead_code)]

use depreg::link::{HasRegistryLink, RegistryLink};

#[derive(HasRegistryLink)]
struct Service {
    primary: RegistryLink,
    fallback: RegistryLink,
}

fn main() {}
