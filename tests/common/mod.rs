//! In-process ledger used by the integration tests.
//!
//! `MockLedger` keeps just enough state (files, contracts, receipts) to answer
//! the requests the crate sends, and records every call. Per-node scripts can
//! override the next answers with a status, a transport failure or a hang.

#![allow(dead_code)]

use async_trait::async_trait;
use ledger_exec::query::{AccountBalance, ContractInfo, FileInfo};
use ledger_exec::transport::{Channel, TransportError};
use ledger_exec::wire::{
    Answer, Method, QueryBody, Response, ResponseHeader, ResponseType, SignedTransaction,
    TransactionData, TransactionResponseBody, WireRequest, WireResponse,
};
use ledger_exec::{
    AccountId, Client, ClientBuilder, ContractId, FileId, Hbar, Network, PublicKey, RetryPolicy,
    Signer, Status, TransactionId, TransactionReceipt,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const OPERATOR: AccountId = AccountId::new(0, 0, 2);
/// Below this a contract constructor runs out of gas.
pub const MIN_CONTRACT_GAS: u64 = 10_000;

pub struct TestSigner;

impl Signer for TestSigner {
    fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(vec![0xed; 32])
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        // Not a real signature; only its presence matters to the mock.
        message.iter().rev().take(64).copied().collect()
    }
}

/// Forced outcome for the next call to a node.
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Status(Status),
    Unreachable,
    /// Never answers.
    Hang,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub node: AccountId,
    pub method: Method,
    pub request: WireRequest,
}

impl Call {
    pub fn query_payment(&self) -> Option<(&SignedTransaction, ResponseType)> {
        match &self.request {
            WireRequest::Query(q) => q.header.payment.as_ref().map(|p| (p, q.header.response_type)),
            WireRequest::Transaction(_) => None,
        }
    }

    /// Amount transferred to the answering node by an attached payment.
    pub fn paid_amount(&self) -> Option<Hbar> {
        let (payment, _) = self.query_payment()?;
        let body = payment.body().ok()?;
        match body.data {
            TransactionData::CryptoTransfer { transfers } => transfers
                .iter()
                .find(|t| t.account_id == body.node_account_id)
                .map(|t| t.amount),
            _ => None,
        }
    }
}

struct PendingReceipt {
    receipt: TransactionReceipt,
    polls_until_final: u32,
}

struct LedgerState {
    next_entity: u64,
    query_cost: u64,
    receipt_delay: u32,
    files: HashMap<FileId, FileInfo>,
    contracts: HashMap<ContractId, ContractInfo>,
    receipts: HashMap<TransactionId, PendingReceipt>,
    seen: HashSet<TransactionId>,
    scripts: HashMap<AccountId, VecDeque<Scripted>>,
    calls: Vec<Call>,
}

pub struct MockLedger {
    state: Mutex<LedgerState>,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(LedgerState {
                next_entity: 1001,
                query_cost: 10,
                receipt_delay: 0,
                files: HashMap::new(),
                contracts: HashMap::new(),
                receipts: HashMap::new(),
                seen: HashSet::new(),
                scripts: HashMap::new(),
                calls: Vec::new(),
            }),
        })
    }

    /// Cost in tinybars reported for paid queries.
    pub fn set_query_cost(&self, tinybars: u64) {
        self.state.lock().unwrap().query_cost = tinybars;
    }

    /// Number of receipt polls answered with `UNKNOWN` before the final receipt.
    pub fn set_receipt_delay(&self, polls: u32) {
        self.state.lock().unwrap().receipt_delay = polls;
    }

    pub fn script(&self, node: AccountId, outcomes: impl IntoIterator<Item = Scripted>) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .entry(node)
            .or_default()
            .extend(outcomes);
    }

    pub fn add_file(&self, contents: &[u8]) -> FileId {
        let mut st = self.state.lock().unwrap();
        let file_id = FileId::new(0, 0, st.next_entity);
        st.next_entity += 1;
        st.files.insert(
            file_id,
            FileInfo {
                file_id,
                size: contents.len() as u64,
                expiration_time_seconds: 0,
                deleted: false,
                keys: vec![TestSigner.public_key()],
            },
        );
        file_id
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: Method) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    /// Queries sent with a real (answer-only) payment attached.
    pub fn payment_bearing_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c.query_payment(), Some((_, ResponseType::AnswerOnly))))
            .collect()
    }

    pub fn contract(&self, id: ContractId) -> Option<ContractInfo> {
        self.state.lock().unwrap().contracts.get(&id).cloned()
    }

    fn next_scripted(&self, node: AccountId) -> Option<Scripted> {
        self.state
            .lock()
            .unwrap()
            .scripts
            .get_mut(&node)
            .and_then(|q| q.pop_front())
    }

    fn record(&self, node: AccountId, method: Method, request: &WireRequest) {
        self.state.lock().unwrap().calls.push(Call {
            node,
            method,
            request: request.clone(),
        });
    }

    fn handle(&self, node: AccountId, request: WireRequest) -> WireResponse {
        match request {
            WireRequest::Query(q) => {
                WireResponse::Query(self.answer_query(node, q.header.payment, q.header.response_type, q.body))
            }
            WireRequest::Transaction(signed) => {
                WireResponse::Transaction(self.submit(node, signed))
            }
        }
    }

    fn answer_query(
        &self,
        node: AccountId,
        payment: Option<SignedTransaction>,
        response_type: ResponseType,
        body: QueryBody,
    ) -> Response {
        let mut st = self.state.lock().unwrap();
        let cost = st.query_cost;
        let reply = |status: Status, answer: Option<Answer>| Response {
            header: ResponseHeader {
                node_transaction_precheck_code: status,
                response_type,
                cost,
            },
            answer,
        };

        let paid = matches!(body, QueryBody::FileGetInfo { .. } | QueryBody::ContractGetInfo { .. });
        if paid {
            let Some(payment) = payment else {
                return reply(Status::InsufficientTxFee, None);
            };
            if response_type == ResponseType::CostAnswer {
                return reply(Status::Ok, None);
            }
            let Ok(tx) = payment.body() else {
                return reply(Status::InvalidTransactionBody, None);
            };
            if tx.node_account_id != node {
                return reply(Status::InvalidNodeAccount, None);
            }
            let amount = match &tx.data {
                TransactionData::CryptoTransfer { transfers } => transfers
                    .iter()
                    .find(|t| t.account_id == node)
                    .map(|t| t.amount.to_tinybars())
                    .unwrap_or(0),
                _ => 0,
            };
            if amount < cost as i64 {
                return reply(Status::InsufficientTxFee, None);
            }
        }

        match body {
            QueryBody::FileGetInfo { file_id } => match st.files.get(&file_id) {
                Some(info) => reply(
                    Status::Ok,
                    Some(Answer::FileGetInfo {
                        file_info: info.clone(),
                    }),
                ),
                None => reply(Status::InvalidFileId, None),
            },
            QueryBody::ContractGetInfo { contract_id } => match st.contracts.get(&contract_id) {
                Some(info) => reply(
                    Status::Ok,
                    Some(Answer::ContractGetInfo {
                        contract_info: info.clone(),
                    }),
                ),
                None => reply(Status::InvalidContractId, None),
            },
            QueryBody::CryptoGetBalance { account_id } => reply(
                Status::Ok,
                Some(Answer::CryptoGetBalance {
                    balance: AccountBalance {
                        account_id,
                        hbars: Hbar::new(100),
                    },
                }),
            ),
            QueryBody::TransactionGetReceipt { transaction_id } => {
                match st.receipts.get_mut(&transaction_id) {
                    None => reply(Status::ReceiptNotFound, None),
                    Some(pending) if pending.polls_until_final > 0 => {
                        pending.polls_until_final -= 1;
                        reply(
                            Status::Ok,
                            Some(Answer::TransactionGetReceipt {
                                receipt: TransactionReceipt {
                                    status: Status::Unknown,
                                    ..Default::default()
                                },
                            }),
                        )
                    }
                    Some(pending) => reply(
                        Status::Ok,
                        Some(Answer::TransactionGetReceipt {
                            receipt: pending.receipt.clone(),
                        }),
                    ),
                }
            }
        }
    }

    fn submit(&self, node: AccountId, signed: SignedTransaction) -> TransactionResponseBody {
        let precheck = |status: Status| TransactionResponseBody {
            node_transaction_precheck_code: status,
            cost: 0,
        };
        let Ok(tx) = signed.body() else {
            return precheck(Status::InvalidTransactionBody);
        };
        if signed.sig_map.is_empty() {
            return precheck(Status::InvalidSignature);
        }
        if tx.node_account_id != node {
            return precheck(Status::InvalidNodeAccount);
        }

        let mut st = self.state.lock().unwrap();
        if !st.seen.insert(tx.transaction_id) {
            return precheck(Status::DuplicateTransaction);
        }

        let receipt = st.apply(tx.data);
        let polls_until_final = st.receipt_delay;
        st.receipts.insert(
            tx.transaction_id,
            PendingReceipt {
                receipt,
                polls_until_final,
            },
        );
        precheck(Status::Ok)
    }
}

impl LedgerState {
    fn next_num(&mut self) -> u64 {
        let num = self.next_entity;
        self.next_entity += 1;
        num
    }

    fn apply(&mut self, data: TransactionData) -> TransactionReceipt {
        let status_only = |status: Status| TransactionReceipt {
            status,
            ..Default::default()
        };
        match data {
            TransactionData::CryptoTransfer { .. } => status_only(Status::Success),
            TransactionData::FileCreate { keys, contents, expiration_time_seconds } => {
                let file_id = FileId::new(0, 0, self.next_num());
                self.files.insert(
                    file_id,
                    FileInfo {
                        file_id,
                        size: contents.len() as u64,
                        expiration_time_seconds: expiration_time_seconds.unwrap_or(0),
                        deleted: false,
                        keys,
                    },
                );
                TransactionReceipt {
                    status: Status::Success,
                    file_id: Some(file_id),
                    ..Default::default()
                }
            }
            TransactionData::FileDelete { file_id } => match self.files.get_mut(&file_id) {
                Some(info) if !info.deleted => {
                    info.deleted = true;
                    status_only(Status::Success)
                }
                Some(_) => status_only(Status::FileDeleted),
                None => status_only(Status::InvalidFileId),
            },
            TransactionData::ContractCreate { file_id, admin_key, gas, initial_balance, memo, .. } => {
                let Some(file_id) = file_id else {
                    return status_only(Status::InvalidFileId);
                };
                if !self.files.contains_key(&file_id) {
                    return status_only(Status::InvalidFileId);
                }
                if gas < MIN_CONTRACT_GAS {
                    return status_only(Status::InsufficientGas);
                }
                let num = self.next_num();
                let contract_id = ContractId::new(0, 0, num);
                self.contracts.insert(
                    contract_id,
                    ContractInfo {
                        contract_id,
                        account_id: AccountId::new(0, 0, num),
                        admin_key,
                        expiration_time_seconds: 0,
                        storage: 0,
                        contract_memo: memo,
                        balance: initial_balance,
                    },
                );
                TransactionReceipt {
                    status: Status::Success,
                    contract_id: Some(contract_id),
                    ..Default::default()
                }
            }
            TransactionData::ContractDelete { contract_id, .. } => {
                let immutable = match self.contracts.get(&contract_id) {
                    Some(info) => info.admin_key.is_none(),
                    None => return status_only(Status::InvalidContractId),
                };
                if immutable {
                    return status_only(Status::ModifyingImmutableContract);
                }
                self.contracts.remove(&contract_id);
                status_only(Status::Success)
            }
        }
    }
}

/// Channel bound to one node of a [`MockLedger`].
pub struct NodeChannel {
    node: AccountId,
    ledger: Arc<MockLedger>,
}

#[async_trait]
impl Channel for NodeChannel {
    async fn call(
        &self,
        method: Method,
        request: WireRequest,
    ) -> Result<WireResponse, TransportError> {
        self.ledger.record(self.node, method, &request);
        match self.ledger.next_scripted(self.node) {
            Some(Scripted::Unreachable) => {
                Err(TransportError::Unavailable(format!("node {} is down", self.node)))
            }
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Unavailable("hung".into()))
            }
            Some(Scripted::Status(status)) => Ok(match request {
                WireRequest::Query(q) => WireResponse::Query(Response {
                    header: ResponseHeader {
                        node_transaction_precheck_code: status,
                        response_type: q.header.response_type,
                        cost: 0,
                    },
                    answer: None,
                }),
                WireRequest::Transaction(_) => WireResponse::Transaction(TransactionResponseBody {
                    node_transaction_precheck_code: status,
                    cost: 0,
                }),
            }),
            None => Ok(self.ledger.handle(self.node, request)),
        }
    }
}

pub fn node(num: u64) -> AccountId {
    AccountId::new(0, 0, num)
}

/// Nodes `0.0.3 ..` backed by `ledger`.
pub fn network(ledger: &Arc<MockLedger>, nodes: u64) -> Network {
    Network::new((0..nodes).map(|i| {
        let id = node(3 + i);
        let channel: Arc<dyn Channel> = Arc::new(NodeChannel {
            node: id,
            ledger: ledger.clone(),
        });
        (id, channel)
    }))
}

/// Builder with fast backoff and no operator.
pub fn builder(ledger: &Arc<MockLedger>, nodes: u64) -> ClientBuilder {
    Client::builder()
        .network(network(ledger, nodes))
        .retry_policy(
            RetryPolicy::new()
                .with_max_attempts(6)
                .with_backoff(Duration::from_millis(1), Duration::from_millis(8)),
        )
        .request_timeout(Some(Duration::from_secs(10)))
        .receipt_poll_interval(Duration::from_millis(1))
}

/// Client paying from [`OPERATOR`].
pub fn client(ledger: &Arc<MockLedger>, nodes: u64) -> Client {
    builder(ledger, nodes)
        .operator(OPERATOR, Arc::new(TestSigner))
        .build()
        .unwrap()
}
