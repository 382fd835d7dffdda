mod nats_protocol;
