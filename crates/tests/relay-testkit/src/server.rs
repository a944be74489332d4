//! In-memory IMAP server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mailbox_core::{Error, IdleResponse, RawMessage, Uid};
use tokio::sync::Notify;
use tokio::time::Instant;

/// A command observed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    Login,
    Select(String),
    SearchUnseen,
    Fetch(Vec<Uid>),
    IdleStart,
    IdleCheck,
    IdleDone,
    Noop,
    Logout,
}

/// A scripted end to an IDLE wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdleStep {
    /// Report new data.
    NewData,

    /// Report an elapsed timeout.
    Timeout,

    /// Drop the connection.
    Fail,
}

#[derive(Debug)]
struct StoredMessage {
    uid: Uid,
    bytes: Vec<u8>,
    seen: bool,
}

#[derive(Debug)]
struct Inner {
    username: String,
    password: String,
    folders: Vec<String>,
    messages: Vec<StoredMessage>,
    next_uid: Uid,
    refuse_connections: bool,
    fail_idle_done: bool,
    idle_script: VecDeque<IdleStep>,
    calls: Vec<Call>,
    connect_attempts: Vec<Instant>,
}

/// A single-user server with an `INBOX`. Clones share state.
#[derive(Debug, Clone)]
pub struct MockServer {
    inner: Arc<Mutex<Inner>>,
    wake: Arc<Notify>,
}

impl MockServer {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                username: username.to_owned(),
                password: password.to_owned(),
                folders: vec!["INBOX".to_owned()],
                messages: Vec::new(),
                next_uid: 1,
                refuse_connections: false,
                fail_idle_done: false,
                idle_script: VecDeque::new(),
                calls: Vec::new(),
                connect_attempts: Vec::new(),
            })),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Create an additional folder.
    pub fn add_folder(&self, name: &str) {
        self.lock().folders.push(name.to_owned());
    }

    /// Store an unseen message without waking an IDLE wait.
    pub fn add_unseen(&self, bytes: Vec<u8>) -> Uid {
        let mut inner = self.lock();
        let uid = inner.next_uid;
        inner.next_uid += 1;
        inner.messages.push(StoredMessage {
            uid,
            bytes,
            seen: false,
        });
        uid
    }

    /// Store an unseen message and report it to an IDLE wait.
    pub fn deliver(&self, bytes: Vec<u8>) -> Uid {
        let uid = self.add_unseen(bytes);
        self.script_idle(IdleStep::NewData);
        uid
    }

    /// Queue the outcome of a future IDLE wait.
    pub fn script_idle(&self, step: IdleStep) {
        self.lock().idle_script.push_back(step);
        self.wake.notify_one();
    }

    /// Refuse (or accept again) new connections.
    pub fn refuse_connections(&self, refuse: bool) {
        self.lock().refuse_connections = refuse;
    }

    /// Make leaving IDLE fail.
    pub fn fail_idle_done(&self, fail: bool) {
        self.lock().fail_idle_done = fail;
    }

    /// Every command seen so far.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// How often `call` was seen.
    pub fn count(&self, call: &Call) -> usize {
        self.lock().calls.iter().filter(|seen| *seen == call).count()
    }

    /// When each connection attempt happened.
    pub fn connect_attempts(&self) -> Vec<Instant> {
        self.lock().connect_attempts.clone()
    }

    /// UIDs of messages not yet fetched.
    pub fn unseen(&self) -> Vec<Uid> {
        self.lock()
            .messages
            .iter()
            .filter(|message| !message.seen)
            .map(|message| message.uid)
            .collect()
    }

    /// A transport connecting to this server.
    pub fn transport(&self) -> MockTransport {
        MockTransport {
            server: self.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("server mutex poisoned")
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }
}

/// Connects to a [`MockServer`].
#[derive(Debug, Clone)]
pub struct MockTransport {
    server: MockServer,
}

impl mailbox_core::Transport for MockTransport {
    type Client = MockClient;

    async fn connect(&self) -> Result<MockClient, Error> {
        let refuse = {
            let mut inner = self.server.lock();
            inner.calls.push(Call::Connect);
            inner.connect_attempts.push(Instant::now());
            inner.refuse_connections
        };

        if refuse {
            return Err(Error::connection(std::io::Error::from(
                std::io::ErrorKind::ConnectionRefused,
            )));
        }

        Ok(MockClient {
            server: self.server.clone(),
        })
    }
}

/// A connection awaiting `LOGIN`.
#[derive(Debug)]
pub struct MockClient {
    server: MockServer,
}

impl mailbox_core::Client for MockClient {
    type Mailbox = MockMailbox;

    async fn login(self, username: &str, password: &str) -> Result<MockMailbox, Error> {
        let accepted = {
            let mut inner = self.server.lock();
            inner.calls.push(Call::Login);
            inner.username == username && inner.password == password
        };

        if !accepted {
            return Err(Error::auth("[AUTHENTICATIONFAILED] invalid credentials"));
        }

        Ok(MockMailbox {
            server: self.server,
            selected: None,
            idling: false,
        })
    }
}

/// An authenticated connection.
#[derive(Debug)]
pub struct MockMailbox {
    server: MockServer,
    selected: Option<String>,
    idling: bool,
}

impl MockMailbox {
    fn ensure_ready(&self) -> Result<(), Error> {
        if self.idling {
            return Err(Error::protocol("command issued while in IDLE"));
        }
        Ok(())
    }

    fn ensure_selected(&self) -> Result<(), Error> {
        self.ensure_ready()?;
        if self.selected.is_none() {
            return Err(Error::protocol("no folder selected"));
        }
        Ok(())
    }

    fn next_idle_step(&self) -> Option<IdleStep> {
        self.server.lock().idle_script.pop_front()
    }
}

impl mailbox_core::Mailbox for MockMailbox {
    async fn select(&mut self, folder: &str) -> Result<(), Error> {
        self.ensure_ready()?;
        self.server.record(Call::Select(folder.to_owned()));

        if !self.server.lock().folders.iter().any(|name| name == folder) {
            return Err(Error::protocol("[NONEXISTENT] no such mailbox"));
        }
        self.selected = Some(folder.to_owned());
        Ok(())
    }

    async fn search_unseen(&mut self) -> Result<Vec<Uid>, Error> {
        self.ensure_selected()?;
        self.server.record(Call::SearchUnseen);
        Ok(self.server.unseen())
    }

    async fn fetch_rfc822(&mut self, uids: &[Uid]) -> Result<Vec<RawMessage>, Error> {
        self.ensure_selected()?;
        let mut inner = self.server.lock();
        inner.calls.push(Call::Fetch(uids.to_vec()));

        let mut fetched = Vec::new();
        for uid in uids {
            if let Some(message) = inner.messages.iter_mut().find(|message| message.uid == *uid) {
                message.seen = true;
                fetched.push(RawMessage {
                    uid: message.uid,
                    bytes: message.bytes.clone(),
                });
            }
        }
        Ok(fetched)
    }

    async fn idle_start(&mut self) -> Result<(), Error> {
        self.ensure_selected()?;
        self.server.record(Call::IdleStart);
        self.idling = true;
        Ok(())
    }

    async fn idle_check<I>(&mut self, _timeout: Duration, interrupt: I) -> Result<IdleResponse, Error>
    where
        I: Future<Output = ()> + Send,
    {
        self.server.record(Call::IdleCheck);
        if !self.idling {
            return Err(Error::protocol("IDLE check outside of IDLE"));
        }

        let mut interrupt = std::pin::pin!(interrupt);
        loop {
            let notified = self.server.wake.notified();
            match self.next_idle_step() {
                Some(IdleStep::NewData) => return Ok(IdleResponse::NewData),
                Some(IdleStep::Timeout) => return Ok(IdleResponse::Timeout),
                Some(IdleStep::Fail) => {
                    return Err(Error::connection(std::io::Error::from(
                        std::io::ErrorKind::ConnectionReset,
                    )));
                }
                None => {}
            }

            tokio::select! {
                () = &mut interrupt => return Ok(IdleResponse::Interrupted),
                () = notified => {}
            }
        }
    }

    async fn idle_done(&mut self) -> Result<(), Error> {
        self.server.record(Call::IdleDone);
        if !self.idling {
            return Err(Error::protocol("IDLE DONE outside of IDLE"));
        }
        self.idling = false;

        if self.server.lock().fail_idle_done {
            return Err(Error::connection(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        Ok(())
    }

    async fn noop(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.server.record(Call::Noop);
        Ok(())
    }

    async fn logout(&mut self) -> Result<(), Error> {
        self.ensure_ready()?;
        self.server.record(Call::Logout);
        Ok(())
    }
}
