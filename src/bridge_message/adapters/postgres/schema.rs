//! Diesel schema for bridge message persistence.

diesel::table! {
    /// Messages sent from L1 toward L2.
    l1_bridge_messages (message_hash) {
        /// `0x`-prefixed message hash.
        #[max_length = 66]
        message_hash -> Varchar,
        /// Messenger nonce (`UINT256` domain).
        nonce -> Numeric,
        /// Hash of the deposit transaction that emitted the message.
        #[max_length = 66]
        transaction_source_hash -> Varchar,
        /// Pipeline event that observed the send.
        sent_message_event_guid -> Uuid,
        /// Pipeline event that observed the relay, once relayed.
        relayed_message_event_guid -> Nullable<Uuid>,
        /// Origin transaction sender.
        #[max_length = 42]
        from_address -> Varchar,
        /// Origin transaction target.
        #[max_length = 42]
        to_address -> Varchar,
        /// Transferred value (`UINT256` domain).
        amount -> Numeric,
        /// Destination gas limit (`UINT256` domain).
        gas_limit -> Numeric,
        /// Message calldata.
        data -> Bytea,
        /// Origin block timestamp in seconds.
        timestamp -> Int8,
    }
}

diesel::table! {
    /// Messages sent from L2 toward L1.
    l2_bridge_messages (message_hash) {
        /// `0x`-prefixed message hash.
        #[max_length = 66]
        message_hash -> Varchar,
        /// Messenger nonce (`UINT256` domain).
        nonce -> Numeric,
        /// Hash of the withdrawal transaction that emitted the message.
        #[max_length = 66]
        transaction_withdrawal_hash -> Varchar,
        /// Pipeline event that observed the send.
        sent_message_event_guid -> Uuid,
        /// Pipeline event that observed the relay, once relayed.
        relayed_message_event_guid -> Nullable<Uuid>,
        /// Origin transaction sender.
        #[max_length = 42]
        from_address -> Varchar,
        /// Origin transaction target.
        #[max_length = 42]
        to_address -> Varchar,
        /// Transferred value (`UINT256` domain).
        amount -> Numeric,
        /// Destination gas limit (`UINT256` domain).
        gas_limit -> Numeric,
        /// Message calldata.
        data -> Bytea,
        /// Origin block timestamp in seconds.
        timestamp -> Int8,
    }
}
