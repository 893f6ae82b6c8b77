use edgegw_types as types;
use edgegw_types::TaskStatus;
use reqwest::Url;
use tokio::time::sleep;
use tracing::debug;

use crate::{Client, Error};

/// Handle to a server-side operation started by a reconfiguration.
#[derive(Debug, Clone)]
pub struct Task {
    client: Client,
    task: types::Task,
}

impl Task {
    pub(crate) fn new(client: Client, task: types::Task) -> Self {
        Self { client, task }
    }

    pub fn status(&self) -> TaskStatus {
        self.task.status()
    }

    pub fn href(&self) -> &str {
        &self.task.href
    }

    /// The task document as last received.
    pub fn document(&self) -> &types::Task {
        &self.task
    }

    pub fn into_document(self) -> types::Task {
        self.task
    }

    /// Fetch the current state of this task.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        if self.task.href.is_empty() {
            return Err(Error::MissingState("task href"));
        }
        let url = Url::parse(&self.task.href)?;
        self.task = self
            .client
            .get(url)
            .await
            .map_err(|e| e.during("refresh task"))?;
        Ok(())
    }

    /// Poll until the task has finished.
    pub async fn wait(&mut self) -> Result<(), Error> {
        let delay = self.client.config().task_poll_interval();
        loop {
            match self.status() {
                TaskStatus::Success => return Ok(()),
                TaskStatus::Error => {
                    let message = self
                        .task
                        .error
                        .as_ref()
                        .map(|e| e.message.clone())
                        .unwrap_or_else(|| self.task.status.clone());
                    return Err(Error::TaskFailed { message });
                }
                s @ (TaskStatus::Canceled | TaskStatus::Aborted) => {
                    return Err(Error::TaskAborted { status: s });
                }
                s => {
                    debug!(
                        node   = %self.client.config().label(),
                        task   = %self.task.href,
                        status = %s,
                        "task pending"
                    );
                    sleep(delay).await;
                    self.refresh().await?
                }
            }
        }
    }
}
