pub mod application {
    pub mod agent {
        pub mod run;
    }
    pub mod chat {
        pub mod clear_history;
        pub mod get_history;
        pub mod send_message;
    }
    pub mod mcp {
        pub mod connect;
        pub mod list_tools;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod agent {
        pub mod errors;
        pub mod model;
        pub mod services;
        pub mod use_cases {
            pub mod run;
        }
    }
    pub mod chat {
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod use_cases {
            pub mod clear_history;
            pub mod get_history;
            pub mod send_message;
        }
    }
    pub mod mcp {
        pub mod errors;
        pub mod model;
        pub mod services;
        pub mod session;
        pub mod value_objects;
        pub mod use_cases {
            pub mod connect;
            pub mod list_tools;
        }
    }
}
