//! [`ProviderType`] metadata for IBM Power HMC.

use std::collections::BTreeMap;

use serde_json::json;

use crate::config::{SecurityProtocol, DEFAULT_API_PORT, DEFAULT_USERID};
use crate::provider::{
    Capabilities, CredentialCheck, FieldType, ProviderType, SelectOption, SettingsField,
    SettingsGroup, SettingsSchema,
};

pub const HMC_TYPE_ID: &str = "ibm_power_hmc";
pub const HMC_DESCRIPTION: &str = "IBM Power HMC";

/// The IBM Power HMC provider type.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmcProvider;

impl ProviderType for HmcProvider {
    fn type_id(&self) -> &str {
        HMC_TYPE_ID
    }

    fn description(&self) -> &str {
        HMC_DESCRIPTION
    }

    fn settings_schema(&self) -> SettingsSchema {
        SettingsSchema {
            groups: vec![SettingsGroup {
                key: "endpoints".to_string(),
                label: "Endpoints".to_string(),
                credential_check: Some(CredentialCheck {
                    key: "authentications.default.valid".to_string(),
                    skip_submit: true,
                    validation_dependencies: vec!["type".to_string(), "zone_id".to_string()],
                }),
                fields: vec![
                    SettingsField::new(
                        "endpoints.default.security_protocol",
                        "Security Protocol",
                        FieldType::Select {
                            options: vec![
                                SelectOption::new(
                                    SecurityProtocol::SslNoValidation.as_str(),
                                    "SSL without validation",
                                ),
                                SelectOption::new(
                                    SecurityProtocol::SslWithValidation.as_str(),
                                    "SSL",
                                ),
                            ],
                        },
                        true,
                    )
                    .with_default(json!(SecurityProtocol::default().as_str())),
                    SettingsField::new(
                        "endpoints.default.hostname",
                        "Hostname (or IPv4 or IPv6 address)",
                        FieldType::Text,
                        true,
                    )
                    .with_placeholder("hmc.example.com"),
                    SettingsField::new("endpoints.default.port", "API Port", FieldType::Port, true)
                        .with_default(json!(DEFAULT_API_PORT))
                        .with_description("Port of the HMC REST API"),
                    SettingsField::new(
                        "authentications.default.userid",
                        "Username",
                        FieldType::Text,
                        true,
                    )
                    .with_default(json!(DEFAULT_USERID)),
                    SettingsField::new(
                        "authentications.default.password",
                        "Password",
                        FieldType::Password,
                        true,
                    ),
                ],
            }],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            catalog: true,
            create: true,
            metrics: true,
            native_console: true,
            provisioning: true,
        }
    }

    fn catalog_types(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(HMC_TYPE_ID.to_string(), HMC_DESCRIPTION.to_string())])
    }
}
