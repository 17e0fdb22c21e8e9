//! Print the PoisonPillConfig CustomResourceDefinition as YAML.
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/poisonpillconfig.yaml
//! ```

use kube::CustomResourceExt;
use poison_pill_webhook::crd::PoisonPillConfig;

fn main() -> Result<(), serde_yaml::Error> {
    print!("{}", serde_yaml::to_string(&PoisonPillConfig::crd())?);
    Ok(())
}
