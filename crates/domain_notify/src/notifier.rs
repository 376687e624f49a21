//! Best-effort dual-channel notifier
//!
//! Sends the rendered stage message to every resolved recipient over SMS and
//! WhatsApp. The two channels run independently; each failure is logged and
//! swallowed so that a broken channel never blocks the other one or the
//! surrounding case-update flow.

use std::sync::Arc;
use tracing::{debug, warn};

use core_kernel::Timezone;
use domain_escalation::{Escalation, OrgHierarchy};
use domain_signal::Case;

use crate::templates::{render_message, MessageContext};
use crate::transport::{SmsGateway, WhatsappGateway};

pub struct Notifier {
    sms: Arc<dyn SmsGateway>,
    whatsapp: Arc<dyn WhatsappGateway>,
    org: Arc<dyn OrgHierarchy>,
    timezone: Timezone,
}

impl Notifier {
    pub fn new(
        sms: Arc<dyn SmsGateway>,
        whatsapp: Arc<dyn WhatsappGateway>,
        org: Arc<dyn OrgHierarchy>,
        timezone: Timezone,
    ) -> Self {
        Self {
            sms,
            whatsapp,
            org,
            timezone,
        }
    }

    /// Formats and sends the stage message to the escalation's recipients
    ///
    /// Fire-and-forget: lookup and transport failures are logged, never
    /// returned.
    pub async fn dispatch(&self, case: &Case, escalation: &Escalation) {
        let phones: Vec<String> = escalation
            .recipients
            .iter()
            .map(|p| p.phone.clone())
            .collect();
        if phones.is_empty() {
            debug!(case = %case.case_number, "no recipients to notify");
            return;
        }

        // Unit name lookup is cosmetic; fall back to the id on failure
        let unit_name = match self.org.unit(case.reporting_unit).await {
            Ok(unit) => unit.name,
            Err(e) => {
                warn!(case = %case.case_number, error = %e, "unit name lookup failed");
                case.reporting_unit.to_string()
            }
        };

        let message = render_message(
            escalation.stage,
            escalation.kind,
            &MessageContext {
                case,
                unit_name: &unit_name,
                timezone: self.timezone,
            },
        );

        let (sms_result, whatsapp_result) = tokio::join!(
            self.sms.send(&phones, &message),
            self.whatsapp.send(&phones, &message),
        );

        if let Err(e) = sms_result {
            warn!(case = %case.case_number, error = %e, "sms delivery failed");
        }
        if let Err(e) = whatsapp_result {
            warn!(case = %case.case_number, error = %e, "whatsapp delivery failed");
        }

        debug!(
            case = %case.case_number,
            stage = %escalation.stage,
            recipients = phones.len(),
            "notification dispatched"
        );
    }
}
