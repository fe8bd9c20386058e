use std::string::String;

use lapin::uri::{AMQPAuthority, AMQPUri, AMQPUserInfo};

use crate::config::Env;

pub struct AmqpConfig {
    pub uri: AMQPUri,
    pub publisher_confirms: bool,
}

impl AmqpConfig {
    pub fn new(env: &Env) -> Self {
        Self {
            uri: AMQPUri {
                authority: AMQPAuthority {
                    userinfo: AMQPUserInfo {
                        username: env.amqp_user.clone(),
                        password: env.amqp_password.clone(),
                    },
                    host: env.amqp_host.clone(),
                    port: env.amqp_port,
                },
                vhost: env.amqp_vhost.clone(),
                ..Default::default()
            },
            publisher_confirms: env.publisher_confirms,
        }
    }

    // broker location for logs and errors, never includes the password
    pub fn display_uri(&self) -> String {
        format!(
            "amqp://{}@{}:{}/{}",
            self.uri.authority.userinfo.username,
            self.uri.authority.host,
            self.uri.authority.port,
            self.uri.vhost.replace('/', "%2f")
        )
    }
}
