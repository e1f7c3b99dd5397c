//! JSON-over-TCP remoting client for the analysis application.
//!
//! The application exposes its object model on a local socket speaking
//! newline-delimited JSON: one `{id, method, params}` request per line, one
//! `{id, result}` or `{id, error}` response per line. Calls are strictly
//! sequential, matching the single-threaded extraction pipeline.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::client::ports::ModelApi;
use crate::error::{ExtractError, Result};
use crate::model::{
    AnalysisType, DocumentInfo, InstanceInfo, Loadcase, LoadingDirection, LoadingRef,
    LoadingResultKind, LoadingValueKind, MemberInfo, NodalDisplacement, ResultsId, SolverModelId,
    SpanInfo,
};

#[derive(Serialize)]
struct Request<'a, P: Serialize> {
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct Response {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

struct Connection {
    reader: BufReader<ReadHalf<TcpStream>>,
    writer: WriteHalf<TcpStream>,
}

/// Client for one running application instance.
pub struct RemotingClient {
    connection: Mutex<Connection>,
    next_id: AtomicU64,
    call_timeout: Duration,
}

impl RemotingClient {
    /// Connect to the remoting listener. A refused connection means no
    /// instance is running; the caller turns that into a clean early exit.
    pub async fn connect(host: &str, port: u16, call_timeout: Duration) -> std::io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        let (read_half, write_half) = tokio::io::split(stream);

        Ok(Self {
            connection: Mutex::new(Connection {
                reader: BufReader::new(read_half),
                writer: write_half,
            }),
            next_id: AtomicU64::new(1),
            call_timeout,
        })
    }

    async fn call<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: P) -> Result<R> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut line = serde_json::to_string(&Request { id, method, params }).map_err(|e| {
            ExtractError::Protocol {
                message: format!("Failed to encode '{}' request: {}", method, e),
            }
        })?;
        line.push('\n');

        let mut connection = self.connection.lock().await;

        let exchange = async {
            connection.writer.write_all(line.as_bytes()).await?;
            connection.writer.flush().await?;

            let mut response_line = String::new();
            let read = connection.reader.read_line(&mut response_line).await?;
            Ok::<_, std::io::Error>((read, response_line))
        };

        let (read, response_line) = tokio::time::timeout(self.call_timeout, exchange)
            .await
            .map_err(|_| ExtractError::Timeout {
                seconds: self.call_timeout.as_secs(),
            })?
            .map_err(|e| ExtractError::Connection {
                message: e.to_string(),
            })?;

        if read == 0 {
            return Err(ExtractError::Connection {
                message: "connection closed by the application".to_string(),
            });
        }

        let response: Response =
            serde_json::from_str(&response_line).map_err(|e| ExtractError::Protocol {
                message: format!("Malformed response to '{}': {}", method, e),
            })?;

        if response.id != id {
            return Err(ExtractError::Protocol {
                message: format!(
                    "Response id {} does not match request id {} for '{}'",
                    response.id, id, method
                ),
            });
        }

        if let Some(error) = response.error {
            return Err(ExtractError::Api {
                method: method.to_string(),
                message: error,
            });
        }

        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(|e| ExtractError::Protocol {
            message: format!("Unexpected result shape for '{}': {}", method, e),
        })
    }
}

impl ModelApi for RemotingClient {
    async fn running_instances(&self) -> Result<Vec<InstanceInfo>> {
        self.call("GetRunningInstances", ()).await
    }

    async fn active_document(&self) -> Result<Option<DocumentInfo>> {
        self.call("GetDocument", ()).await
    }

    async fn has_model(&self) -> Result<bool> {
        self.call("HasModel", ()).await
    }

    async fn solver_models(&self, analysis: AnalysisType) -> Result<Vec<SolverModelId>> {
        self.call("GetSolverModels", serde_json::json!({ "analysisType": analysis }))
            .await
    }

    async fn solver_results(&self, solver: SolverModelId) -> Result<Option<ResultsId>> {
        self.call("GetSolverResults", serde_json::json!({ "solverModel": solver }))
            .await
    }

    async fn solved_loading(&self, results: ResultsId) -> Result<Vec<Uuid>> {
        self.call("GetSolvedLoading", serde_json::json!({ "results": results }))
            .await
    }

    async fn loadcases(&self) -> Result<Vec<Loadcase>> {
        self.call("GetLoadcases", ()).await
    }

    async fn members(&self) -> Result<Vec<MemberInfo>> {
        self.call("GetMembers", ()).await
    }

    async fn spans(&self, member: Uuid) -> Result<Vec<SpanInfo>> {
        self.call("GetSpans", serde_json::json!({ "member": member }))
            .await
    }

    async fn open_loading(
        &self,
        member: Uuid,
        loadcase: Uuid,
        analysis: AnalysisType,
        result_kind: LoadingResultKind,
    ) -> Result<Option<LoadingRef>> {
        self.call(
            "GetMemberLoading",
            serde_json::json!({
                "member": member,
                "loadcase": loadcase,
                "analysisType": analysis,
                "resultKind": result_kind,
            }),
        )
        .await
    }

    async fn loading_values(
        &self,
        loading: LoadingRef,
        kind: LoadingValueKind,
        direction: LoadingDirection,
        span: usize,
        position: f64,
    ) -> Result<Vec<f64>> {
        self.call(
            "GetLoadingValue",
            serde_json::json!({
                "loading": loading,
                "valueKind": kind,
                "direction": direction,
                "span": span,
                "position": position,
            }),
        )
        .await
    }

    async fn nodal_displacements(
        &self,
        results: ResultsId,
        loadcase: Uuid,
    ) -> Result<Vec<NodalDisplacement>> {
        self.call(
            "GetNodalDisplacements",
            serde_json::json!({ "results": results, "loadcase": loadcase }),
        )
        .await
    }
}
