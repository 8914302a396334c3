//! Private networks

use crate::client::HostingV4;
use crate::convert::vlan_from_wire;
use crate::identifiers::required_id;
use crate::params::{ParamSet, ToParams, WireField, list_args};
use crate::rpc::Caller;
use crate::wire::VlanV4;
use async_trait::async_trait;
use gandi_hosting::{HostingError, Result, Vlan, VlanFilter, VlanManager, VlanSpec};
use serde_json::Value;

impl<C: Caller> HostingV4<C> {
    async fn update_vlan(&self, operation: &'static str, vlan: &Vlan, update: ParamSet) -> Result<()> {
        let id = required_id(operation, "Vlan", "ID", &vlan.id)?;
        self.call_and_wait("hosting.vlan.update", vec![Value::from(id), update.into_value()])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<C: Caller> VlanManager for HostingV4<C> {
    async fn create_vlan(&self, spec: &VlanSpec) -> Result<Vlan> {
        if spec.region_id.is_empty() {
            return Err(HostingError::missing("CreateVlan", "VlanSpec", "RegionID"));
        }
        if spec.name.is_empty() {
            return Err(HostingError::missing("CreateVlan", "VlanSpec", "Name"));
        }
        let params = spec.to_params()?;

        tracing::info!(name = %spec.name, "creating vlan");
        self.call_and_wait("hosting.vlan.create", vec![params.into_value()])
            .await?;
        tracing::info!(name = %spec.name, "vlan created");

        // Operations carry no vlan id
        self.vlan_from_name(&spec.name).await
    }

    async fn list_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>> {
        let params = filter.to_params()?;
        let vlans: Vec<VlanV4> = self.call("hosting.vlan.list", list_args(params)).await?;
        Ok(vlans.into_iter().map(vlan_from_wire).collect())
    }

    async fn vlan_from_name(&self, name: &str) -> Result<Vlan> {
        if name.is_empty() {
            return Err(HostingError::missing("VlanFromName", "-", "name"));
        }
        let filter = VlanFilter {
            name: name.to_string(),
            ..Default::default()
        };
        self.list_vlans(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HostingError::not_found("Vlan", name))
    }

    async fn update_vlan_gateway(&self, vlan: &Vlan, gateway: &str) -> Result<Vlan> {
        let mut update = ParamSet::new();
        update.insert(WireField::Gateway, gateway);
        self.update_vlan("UpdateVlanGW", vlan, update).await?;

        // vlan.list describes a vlan better than vlan.info
        let filter = VlanFilter {
            ids: vec![vlan.id.clone()],
            ..Default::default()
        };
        self.list_vlans(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HostingError::not_found("Vlan", &vlan.id))
    }

    async fn rename_vlan(&self, vlan: &Vlan, name: &str) -> Result<Vlan> {
        if name.is_empty() {
            return Err(HostingError::missing("RenameVlan", "Vlan", "Name"));
        }
        let mut update = ParamSet::new();
        update.insert(WireField::Name, name);
        self.update_vlan("RenameVlan", vlan, update).await?;
        self.vlan_from_name(name).await
    }

    async fn delete_vlan(&self, vlan: &Vlan) -> Result<()> {
        let id = required_id("DeleteVlan", "Vlan", "ID", &vlan.id)?;
        self.call_and_wait("hosting.vlan.delete", vec![Value::from(id)])
            .await?;
        tracing::info!(name = %vlan.name, id, "vlan deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCaller;
    use serde_json::json;

    fn wire_vlan(name: &str, gateway: &str) -> Value {
        json!({"id": 5, "name": name, "gateway": gateway, "subnet": "192.168.0.0/24", "datacenter_id": 4})
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_vlan_fetches_by_name() {
        let hosting = HostingV4::new(MockCaller::new());
        hosting
            .caller()
            .expect_with(
                "hosting.vlan.create",
                vec![json!({"name": "private", "subnet": "192.168.0.0/24", "datacenter_id": 4})],
                json!({"id": 30}),
            )
            .expect_statuses(30, &["DONE"])
            .expect_with(
                "hosting.vlan.list",
                vec![json!({"name": "private"})],
                json!([wire_vlan("private", "192.168.0.1")]),
            );

        let spec = VlanSpec {
            name: "private".to_string(),
            subnet: "192.168.0.0/24".to_string(),
            region_id: "4".to_string(),
            ..Default::default()
        };
        let vlan = hosting.create_vlan(&spec).await.unwrap();
        assert_eq!(vlan.id, "5");
        assert_eq!(vlan.gateway, "192.168.0.1");
    }

    #[tokio::test]
    async fn test_create_vlan_needs_name() {
        let hosting = HostingV4::new(MockCaller::new());
        let spec = VlanSpec {
            region_id: "4".to_string(),
            ..Default::default()
        };
        let err = hosting.create_vlan(&spec).await.unwrap_err();
        assert!(matches!(err, HostingError::Validation { field: "Name", .. }));
        assert_eq!(hosting.caller().call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_gateway_fetches_by_id() {
        let hosting = HostingV4::new(MockCaller::new());
        hosting
            .caller()
            .expect_with(
                "hosting.vlan.update",
                vec![json!(5), json!({"gateway": "192.168.0.254"})],
                json!({"id": 31}),
            )
            .expect_statuses(31, &["RUN", "DONE"])
            .expect_with(
                "hosting.vlan.list",
                vec![json!({"id": [5]})],
                json!([wire_vlan("private", "192.168.0.254")]),
            );

        let vlan = Vlan {
            id: "5".to_string(),
            name: "private".to_string(),
            ..Default::default()
        };
        let updated = hosting
            .update_vlan_gateway(&vlan, "192.168.0.254")
            .await
            .unwrap();
        assert_eq!(updated.gateway, "192.168.0.254");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rename_fetches_by_new_name() {
        let hosting = HostingV4::new(MockCaller::new());
        hosting
            .caller()
            .expect_with(
                "hosting.vlan.update",
                vec![json!(5), json!({"name": "backend"})],
                json!({"id": 32}),
            )
            .expect_statuses(32, &["DONE"])
            .expect_with(
                "hosting.vlan.list",
                vec![json!({"name": "backend"})],
                json!([wire_vlan("backend", "")]),
            );

        let vlan = Vlan {
            id: "5".to_string(),
            name: "private".to_string(),
            ..Default::default()
        };
        assert_eq!(hosting.rename_vlan(&vlan, "backend").await.unwrap().name, "backend");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_vlan_failure() {
        let hosting = HostingV4::new(MockCaller::new());
        hosting
            .caller()
            .expect_with("hosting.vlan.delete", vec![json!(5)], json!({"id": 33}))
            .expect_statuses(33, &["ERROR"]);

        let vlan = Vlan {
            id: "5".to_string(),
            ..Default::default()
        };
        let err = hosting.delete_vlan(&vlan).await.unwrap_err();
        assert!(matches!(err, HostingError::OperationFailed { op_id: 33, .. }));
    }
}
