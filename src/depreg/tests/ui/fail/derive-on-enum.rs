#![allow(dead_code)]

use depreg::link::HasRegistryLink;

#[derive(HasRegistryLink)]
enum Event {
    Started,
}

fn main() {}
