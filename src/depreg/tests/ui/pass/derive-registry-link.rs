use std::marker::PhantomData;

use depreg::prelude::*;

#[derive(HasRegistryLink)]
pub struct ByType {
    pub link: RegistryLink,
    pub name: String,
}

#[derive(HasRegistryLink)]
pub struct ByAttribute {
    pub primary: RegistryLink,
    #[registry_link]
    pub owner: depreg::link::RegistryLink,
}

#[derive(HasRegistryLink)]
pub struct Generic<T: Send + Sync + 'static> {
    link: RegistryLink,
    _marker: PhantomData<T>,
}

impl<T: Send + Sync + 'static> BaseDependency for Generic<T> {}

fn main() {
    let by_type = ByType {
        link: RegistryLink::new(),
        name: String::from("by type"),
    };
    assert!(!by_type.registry_link().is_attached());

    let by_attribute = ByAttribute {
        primary: RegistryLink::new(),
        owner: RegistryLink::new(),
    };
    assert!(std::ptr::eq(by_attribute.registry_link(), &by_attribute.owner));

    let generic = Generic::<u8> {
        link: RegistryLink::new(),
        _marker: PhantomData,
    };
    assert!(std::ptr::eq(generic.registry_link(), &generic.link));
}
