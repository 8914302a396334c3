//! Datacenters

use crate::client::HostingV4;
use crate::convert::region_from_wire;
use crate::params::{ParamSet, WireField};
use crate::rpc::Caller;
use crate::wire::RegionV4;
use async_trait::async_trait;
use gandi_hosting::{HostingError, Region, RegionManager, Result};

#[async_trait]
impl<C: Caller> RegionManager for HostingV4<C> {
    async fn list_regions(&self) -> Result<Vec<Region>> {
        let regions: Vec<RegionV4> = self.call("hosting.datacenter.list", Vec::new()).await?;
        Ok(regions.into_iter().map(region_from_wire).collect())
    }

    async fn region_by_code(&self, code: &str) -> Result<Region> {
        if code.is_empty() {
            return Err(HostingError::missing("RegionByCode", "Region", "Name"));
        }
        let filter = ParamSet::new().with(WireField::DcCode, code);
        let regions: Vec<RegionV4> = self
            .call("hosting.datacenter.list", vec![filter.into_value()])
            .await?;
        regions
            .into_iter()
            .next()
            .map(region_from_wire)
            .ok_or_else(|| HostingError::not_found("Region", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCaller;
    use serde_json::json;

    #[tokio::test]
    async fn test_region_by_code() {
        let hosting = HostingV4::new(MockCaller::new());
        hosting.caller().expect_with(
            "hosting.datacenter.list",
            vec![json!({"dc_code": "FR-SD3"})],
            json!([{"id": 4, "dc_code": "FR-SD3", "country": "France"}]),
        );

        let region = hosting.region_by_code("FR-SD3").await.unwrap();
        assert_eq!(
            region,
            Region {
                id: "4".to_string(),
                name: "FR-SD3".to_string(),
                country: "France".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let hosting = HostingV4::new(MockCaller::new());
        hosting
            .caller()
            .expect("hosting.datacenter.list", json!([]));

        let err = hosting.region_by_code("XX-1").await.unwrap_err();
        assert!(matches!(err, HostingError::NotFound { resource: "Region", .. }));
    }

    #[tokio::test]
    async fn test_list_regions() {
        let hosting = HostingV4::new(MockCaller::new());
        hosting.caller().expect_with(
            "hosting.datacenter.list",
            vec![],
            json!([
                {"id": 1, "dc_code": "FR-SD2", "country": "France"},
                {"id": 3, "dc_code": "LU-BI1", "country": "Luxembourg"},
            ]),
        );

        let regions = hosting.list_regions().await.unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].id, "3");
    }
}
