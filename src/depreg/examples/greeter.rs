use std::sync::Arc;

use depreg::prelude::*;

static APP_NAME: DependencyKey<&'static str> = DependencyKey::with_default("app_name", || "app");
static LOGGER: DependencyKey<Arc<dyn Logger>> =
    DependencyKey::with_default("logger", || Arc::new(ConsoleLogger) as Arc<dyn Logger>);
static ENGLISH: DependencyKey<Arc<dyn Greeter>> = DependencyKey::new("greeter.english");
static CHINESE: DependencyKey<Arc<dyn Greeter>> = DependencyKey::new("greeter.chinese");
static APP: DependencyKey<Arc<App>> = DependencyKey::new("app");

fn main() {
    let root = Registry::builder().label("root").build();
    root.register(&APP_NAME, "greeter");

    let session = Registry::builder().label("session").parent(&root).build();
    session.register_all([
        bind(&ENGLISH).to_linked(Arc::new(EnglishGreeter::new()) as Arc<dyn Greeter>),
        bind(&CHINESE).to_linked(Arc::new(ChineseGreeter::new()) as Arc<dyn Greeter>),
        bind(&APP).to_linked(Arc::new(App::new())),
    ]);

    match session.resolve(&APP) {
        Ok(app) => app.run(),
        Err(err) => eprintln!("{err}"),
    }
}

trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("{message}");
    }
}

trait Greeter: BaseDependency {
    fn greet(&self);

    fn say(&self, message: &str) {
        let registry = self.registry();
        let app_name = registry.resolve(&APP_NAME).unwrap_or("app");
        match registry.resolve(&LOGGER) {
            Ok(logger) => logger.log(&format!("[{app_name}] {message}")),
            Err(err) => eprintln!("{err}"),
        }
    }
}

#[derive(HasRegistryLink)]
struct EnglishGreeter {
    link: RegistryLink,
}

impl EnglishGreeter {
    fn new() -> Self {
        Self {
            link: RegistryLink::new(),
        }
    }
}

impl BaseDependency for EnglishGreeter {}

impl Greeter for EnglishGreeter {
    fn greet(&self) {
        self.say("Hello World!");
    }
}

#[derive(HasRegistryLink)]
struct ChineseGreeter {
    link: RegistryLink,
}

impl ChineseGreeter {
    fn new() -> Self {
        Self {
            link: RegistryLink::new(),
        }
    }
}

impl BaseDependency for ChineseGreeter {}

impl Greeter for ChineseGreeter {
    fn greet(&self) {
        self.say("你好世界!");
    }
}

#[derive(HasRegistryLink)]
struct App {
    link: RegistryLink,
}

impl App {
    fn new() -> Self {
        Self {
            link: RegistryLink::new(),
        }
    }

    fn run(&self) {
        let registry = self.registry();
        for key in [&ENGLISH, &CHINESE] {
            match registry.resolve(key) {
                Ok(greeter) => greeter.greet(),
                Err(err) => eprintln!("{err}"),
            }
        }
    }
}

impl BaseDependency for App {}
