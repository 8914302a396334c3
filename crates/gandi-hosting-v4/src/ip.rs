//! IP addresses
//!
//! v4 attaches addresses through network interfaces. Creating an address
//! creates an interface around it, deleting one deletes its interface.

use crate::client::HostingV4;
use crate::convert::ip_from_wire;
use crate::identifiers::required_id;
use crate::params::{ParamSet, ToParams, WireField, list_args};
use crate::rpc::Caller;
use crate::wire::IpAddressV4;
use async_trait::async_trait;
use gandi_hosting::{
    DEFAULT_BANDWIDTH, DELETED_STATE, IpAddress, IpFilter, IpManager, IpVersion, Region, Result,
};
use serde_json::Value;

impl<C: Caller> HostingV4<C> {
    pub(crate) async fn ip_from_id(&self, id: i64) -> Result<IpAddress> {
        let ip: IpAddressV4 = self.call("hosting.ip.info", vec![Value::from(id)]).await?;
        ip_from_wire(ip)
    }

    /// Interface owning the address `ip_id`
    pub(crate) async fn iface_id_from_ip_id(&self, ip_id: i64) -> Result<i64> {
        let ip: IpAddressV4 = self
            .call("hosting.ip.info", vec![Value::from(ip_id)])
            .await?;
        Ok(ip.iface_id)
    }
}

#[async_trait]
impl<C: Caller> IpManager for HostingV4<C> {
    async fn create_ip(&self, region: &Region, version: IpVersion) -> Result<IpAddress> {
        let region_id = required_id("CreateIP", "Region", "ID", &region.id)?;
        let mut params = ParamSet::new();
        params
            .insert(WireField::DatacenterId, region_id)
            .insert(WireField::IpVersion, version.as_i64())
            .insert(WireField::Bandwidth, DEFAULT_BANDWIDTH);

        tracing::info!(region = %region.name, %version, "creating IP");
        let op = self
            .call_and_wait("hosting.iface.create", vec![params.into_value()])
            .await?;
        tracing::info!(id = op.ip_id, "IP created");
        self.ip_from_id(op.ip_id).await
    }

    async fn list_ips(&self, filter: &IpFilter) -> Result<Vec<IpAddress>> {
        let params = filter.to_params()?;
        let ips: Vec<IpAddressV4> = self.call("hosting.ip.list", list_args(params)).await?;
        ips.into_iter().map(ip_from_wire).collect()
    }

    async fn delete_ip(&self, ip: &IpAddress) -> Result<IpAddress> {
        let id = required_id("DeleteIP", "IPAddress", "ID", &ip.id)?;
        let iface = self.iface_id_from_ip_id(id).await?;
        self.call_and_wait("hosting.iface.delete", vec![Value::from(iface)])
            .await?;
        tracing::info!(id, iface, "IP deleted");
        Ok(IpAddress {
            state: DELETED_STATE.to_string(),
            ..ip.clone()
        })
    }
}
