//! Citizen complaint submission: captcha check, report creation and a
//! best-effort notification mail.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::relay::{MailRequest, Mailer};
use crate::store::PortalStore;

pub const COMPLAINT_SUBJECT: &str = "Новое обращение";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
}

/// A small arithmetic question the submitter has to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captcha {
    a: i32,
    b: i32,
    op: Operation,
}

impl Captcha {
    /// Sums use operands 1..=20; differences use 10..=29 minus 1..=10 so the
    /// answer is never negative.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Captcha {
                a: rng.gen_range(1..=20),
                b: rng.gen_range(1..=20),
                op: Operation::Add,
            }
        } else {
            Captcha {
                a: rng.gen_range(10..=29),
                b: rng.gen_range(1..=10),
                op: Operation::Subtract,
            }
        }
    }

    pub fn new(a: i32, op: Operation, b: i32) -> Self {
        Captcha { a, b, op }
    }

    pub fn answer(&self) -> i32 {
        match self.op {
            Operation::Add => self.a + self.b,
            Operation::Subtract => self.a - self.b,
        }
    }

    pub fn check(&self, input: &str) -> bool {
        input.trim().parse::<i32>().map_or(false, |n| n == self.answer())
    }
}

impl fmt::Display for Captcha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.op {
            Operation::Add => '+',
            Operation::Subtract => '-',
        };
        write!(f, "{} {} {} = ?", self.a, sign, self.b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintForm {
    pub description: String,
    pub captcha: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("complaint description is empty")]
    EmptyDescription,
    #[error("captcha answer is wrong")]
    CaptchaMismatch,
}

/// Where new complaints get mailed to.
#[derive(Clone)]
pub struct Forwarding {
    pub mailer: Arc<dyn Mailer>,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered(String),
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub report_id: String,
    pub delivery: Delivery,
}

/// Records the complaint, then tries to mail it. The report stays recorded
/// whatever happens to the mail.
pub async fn submit_complaint(
    store: &mut PortalStore,
    captcha: &Captcha,
    form: &ComplaintForm,
    forwarding: Option<&Forwarding>,
) -> Result<Submission, IntakeError> {
    if form.description.trim().is_empty() {
        return Err(IntakeError::EmptyDescription);
    }
    if !captcha.check(&form.captcha) {
        return Err(IntakeError::CaptchaMismatch);
    }

    let report_id = store.add_report(form.description.clone());
    let delivery = match forwarding {
        Some(forwarding) => {
            let request = MailRequest {
                to: forwarding.recipient.clone(),
                subject: COMPLAINT_SUBJECT.to_string(),
                text: form.description.clone(),
            };
            match forwarding.mailer.send(&request).await {
                Ok(status) => Delivery::Delivered(status),
                Err(e) => {
                    log::warn!("Report {} kept, but mail delivery failed: {}", report_id, e);
                    Delivery::Failed(e.to_string())
                }
            }
        }
        None => Delivery::Skipped,
    };
    Ok(Submission {
        report_id,
        delivery,
    })
}
