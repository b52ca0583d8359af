// ── Pipeline runner ──
//
// Drives work items through resolve → build → submit, strictly in input
// order with every remote call awaited before the next. Failures are
// reported per device or per derived item and never stop the batch.

use tracing::{info, warn};

use crate::build::{generic_resource_spec, lan_resource_specs, site_name_for};
use crate::directory::{DeviceDirectory, ExchangeDirectory};
use crate::error::ItemFailure;
use crate::event::{EventSink, RunEvent};
use crate::loader::LoadedConfig;
use crate::model::{Device, ItemPayload, Pipeline, ResourceSpec, Site, WorkItem};
use crate::reconcile::{SubmissionOutcome, classify_submission};
use crate::resolve::{resolve_site, resolve_targets, validate_site};

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Work items processed.
    pub targets: usize,
    /// Work items whose every derived item succeeded.
    pub targets_succeeded: usize,
    /// Derived items (sites or resources) that succeeded.
    pub succeeded: usize,
    /// Failures reported, at any level.
    pub failed: usize,
}

/// Outcome counts for one work item.
#[derive(Debug, Default)]
struct Tally {
    succeeded: usize,
    failed: usize,
}

impl Tally {
    fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded > 0
    }
}

/// Per-item reporting context.
struct ItemRun<'r, S> {
    item: &'r WorkItem,
    sink: &'r mut S,
    tally: Tally,
}

impl<S: EventSink> ItemRun<'_, S> {
    fn emit(&mut self, event: RunEvent) {
        self.sink.emit(event);
    }

    fn success(&mut self, event: RunEvent) {
        self.tally.succeeded += 1;
        self.sink.emit(event);
    }

    fn fail(&mut self, device: Option<&Device>, subject: Option<&str>, reason: ItemFailure) {
        warn!(target_selector = %self.item.target, %reason, "item failed");
        self.tally.failed += 1;
        self.sink.emit(RunEvent::Failed {
            target: self.item.target.clone(),
            device: device.cloned(),
            subject: subject.map(str::to_owned),
            reason,
        });
    }
}

/// Runs a loaded batch against the two collaborators.
pub struct Provisioner<'a, D, X> {
    devices: &'a D,
    exchange: &'a X,
}

impl<'a, D, X> Provisioner<'a, D, X>
where
    D: DeviceDirectory + Sync,
    X: ExchangeDirectory + Sync,
{
    pub fn new(devices: &'a D, exchange: &'a X) -> Self {
        Self { devices, exchange }
    }

    /// Process every work item of `config`, reporting into `sink`.
    pub async fn run<S: EventSink + Send>(&self, config: &LoadedConfig, sink: &mut S) -> RunSummary {
        info!(
            pipeline = %config.pipeline,
            mode = %config.mode,
            items = config.items.len(),
            "starting run"
        );
        let mut summary = RunSummary::default();

        for item in &config.items {
            let mut run = ItemRun {
                item,
                sink: &mut *sink,
                tally: Tally::default(),
            };
            self.run_item(config.pipeline, &mut run).await;

            summary.targets += 1;
            summary.succeeded += run.tally.succeeded;
            summary.failed += run.tally.failed;
            if run.tally.all_succeeded() {
                summary.targets_succeeded += 1;
                run.emit(RunEvent::TargetSucceeded {
                    target: item.target.clone(),
                });
            }
        }

        info!(?summary, "run finished");
        summary
    }

    async fn run_item<S: EventSink + Send>(&self, pipeline: Pipeline, run: &mut ItemRun<'_, S>) {
        let item = run.item;

        // Generic resource names are checked before any remote call.
        let generic = match &item.payload {
            ItemPayload::Resource {
                value,
                name_override,
            } => match generic_resource_spec(value, name_override.as_deref()) {
                Ok(spec) => Some(spec),
                Err(reason) => {
                    run.fail(None, Some(value.as_str()), reason);
                    return;
                }
            },
            ItemPayload::Site | ItemPayload::LocalNetworks => None,
        };

        let devices = match resolve_targets(self.devices, &item.target).await {
            Ok(devices) => devices,
            Err(reason) => {
                run.fail(None, None, reason);
                return;
            }
        };

        for device in &devices {
            match (&item.payload, &generic) {
                (ItemPayload::Site, _) => self.provision_site(device, run).await,
                (ItemPayload::LocalNetworks, _) => self.provision_lans(device, run).await,
                (ItemPayload::Resource { value, .. }, Some(spec)) => {
                    run.emit(RunEvent::Started {
                        pipeline,
                        device: device.clone(),
                        network_id: item.network_id.clone(),
                        subject: Some(value.clone()),
                    });
                    let site =
                        match resolve_site(self.exchange, device, item.site_name.as_deref()).await {
                            Ok(site) => site,
                            Err(reason) => {
                                run.fail(Some(device), Some(value.as_str()), reason);
                                continue;
                            }
                        };
                    self.submit_resource(device, &site, spec, run).await;
                }
                (ItemPayload::Resource { .. }, None) => {}
            }
        }
    }

    async fn provision_site<S: EventSink + Send>(&self, device: &Device, run: &mut ItemRun<'_, S>) {
        let item = run.item;
        let override_name = item.site_name.as_deref();
        let subject = override_name.unwrap_or(&device.name).to_owned();
        run.emit(RunEvent::Started {
            pipeline: Pipeline::Sites,
            device: device.clone(),
            network_id: item.network_id.clone(),
            subject: Some(subject.clone()),
        });

        let name = match site_name_for(device, override_name) {
            Ok(name) => name,
            Err(reason) => return run.fail(Some(device), Some(subject.as_str()), reason),
        };

        let reply = match self
            .exchange
            .create_site(&name, &item.network_id, &device.id)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                return run.fail(
                    Some(device),
                    Some(name.as_str()),
                    ItemFailure::remote("create site", &e),
                );
            }
        };
        let existed = match classify_submission(&reply) {
            SubmissionOutcome::Created => false,
            SubmissionOutcome::AlreadyExists => true,
            SubmissionOutcome::Rejected(rejection) => {
                return run.fail(Some(device), Some(name.as_str()), ItemFailure::Rejected(rejection));
            }
        };

        // Confirm the site is there and bound to this router.
        let verified = match self.exchange.find_sites(&name).await {
            Ok(entries) => validate_site(&entries, &name, device).map(|_| ()),
            Err(e) => {
                return run.success(RunEvent::SiteUnverified {
                    device: device.clone(),
                    site_name: name,
                    detail: e.to_string(),
                });
            }
        };
        match verified {
            Ok(()) => run.success(RunEvent::SiteReady {
                device: device.clone(),
                site_name: name,
                existed,
            }),
            Err(rejection) if rejection.is_not_found() => run.fail(
                Some(device),
                Some(name.as_str()),
                ItemFailure::SiteMissingAfterCreate { name: name.clone() },
            ),
            Err(other) => run.success(RunEvent::SiteUnverified {
                device: device.clone(),
                site_name: name,
                detail: other.to_string(),
            }),
        }
    }

    async fn provision_lans<S: EventSink + Send>(&self, device: &Device, run: &mut ItemRun<'_, S>) {
        let item = run.item;
        run.emit(RunEvent::Started {
            pipeline: Pipeline::LanResources,
            device: device.clone(),
            network_id: item.network_id.clone(),
            subject: item.site_name.clone(),
        });

        let site = match resolve_site(self.exchange, device, item.site_name.as_deref()).await {
            Ok(site) => site,
            Err(reason) => return run.fail(Some(device), item.site_name.as_deref(), reason),
        };

        let lans = match self.devices.list_local_networks(&device.id).await {
            Ok(lans) => lans,
            Err(e) => {
                return run.fail(Some(device), None, ItemFailure::remote("LAN lookup", &e));
            }
        };

        let specs = match lan_resource_specs(&site, &lans) {
            Ok(specs) => specs,
            Err(reason) => return run.fail(Some(device), None, reason),
        };

        for spec in specs {
            match spec {
                Ok(spec) => self.submit_resource(device, &site, &spec, run).await,
                Err(reason) => run.fail(Some(device), None, reason),
            }
        }
    }

    async fn submit_resource<S: EventSink + Send>(
        &self,
        device: &Device,
        site: &Site,
        spec: &ResourceSpec,
        run: &mut ItemRun<'_, S>,
    ) {
        let reply = match self.exchange.create_resource(&site.id, spec).await {
            Ok(reply) => reply,
            Err(e) => {
                return run.fail(
                    Some(device),
                    Some(spec.name.as_str()),
                    ItemFailure::remote("create resource", &e),
                );
            }
        };
        match classify_submission(&reply) {
            SubmissionOutcome::Created => run.success(RunEvent::ResourceCreated {
                device: device.clone(),
                site_name: site.display_name.clone(),
                spec: spec.clone(),
            }),
            SubmissionOutcome::AlreadyExists => run.success(RunEvent::ResourceExists {
                device: device.clone(),
                spec: spec.clone(),
            }),
            SubmissionOutcome::Rejected(rejection) => run.fail(
                Some(device),
                Some(spec.name.as_str()),
                ItemFailure::Rejected(rejection),
            ),
        }
    }
}
