#![allow(dead_code)]

use depreg::link::{HasRegistryLink, RegistryLink};

#[derive(HasRegistryLink)]
struct Service {
    #[registry_link] primary: RegistryLink,
    #[registry_link] fallback: RegistryLink,
}

fn main() {}
